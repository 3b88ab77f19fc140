use anyhow::Context;
use parkline_client::{ApiError, CachedClient, ClientConfig, NewPermit, ParkingClient};
use serde::Serialize;
use tracing::{error, warn};

use super::args::{CancelArgs, Cli, Command, CreateArgs};
use crate::exit_codes::{SUCCESS, UPSTREAM_FAILED};

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

#[derive(Serialize)]
struct Created {
    permit_id: String,
}

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let base_url = cli.base_url.as_deref();

    match cli.cmd {
        Command::Health => {
            emit(&Health { status: "UP" })?;
            Ok(SUCCESS)
        }
        Command::Quota => {
            let quota = build_client(base_url)?.remaining_quota().await;
            if quota.is_degraded() {
                warn!("usage could not be read; quota shown assumes zero usage");
            }
            println!("{}", quota);
            Ok(SUCCESS)
        }
        Command::Usage => respond(build_client(base_url)?.usage_and_policy().await),
        Command::Permits => {
            let client = build_client(base_url)?;
            respond(client.list_permits().await.map(|permits| permits.to_vec()))
        }
        Command::Create(args) => create(&build_client(base_url)?, args).await,
        Command::Cancel(CancelArgs { permit_id }) => {
            respond(build_client(base_url)?.delete_permit(&permit_id).await)
        }
    }
}

async fn create(client: &CachedClient, args: CreateArgs) -> anyhow::Result<i32> {
    let mut permit = NewPermit::new(args.license_plate).with_duration(args.duration);
    if let Some(email) = args.email {
        permit = permit.with_email(email);
    }
    if let Some(phone) = args.phone {
        permit = permit.with_phone(phone);
    }

    let result = client
        .create_permit(&permit)
        .await
        .map(|permit_id| Created { permit_id });
    respond(result)
}

fn build_client(base_url: Option<&str>) -> anyhow::Result<CachedClient> {
    let mut config = ClientConfig::from_env().context("loading parking configuration")?;
    if let Some(url) = base_url {
        config = config.with_base_url(url);
    }
    let client = ParkingClient::new(config).context("creating parking API client")?;
    Ok(CachedClient::new(client))
}

fn respond<T: Serialize>(result: Result<T, ApiError>) -> anyhow::Result<i32> {
    match result {
        Ok(value) => {
            emit(&value)?;
            Ok(SUCCESS)
        }
        Err(err) => {
            let (status, body) = err.to_response();
            error!(error = %err, detail = err.detail(), status, "parking API operation failed");
            emit(&body)?;
            Ok(UPSTREAM_FAILED)
        }
    }
}

fn emit<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
