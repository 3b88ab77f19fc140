use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "parkline",
    version,
    about = "Tenant parking permits: remaining quota, active permits, create and cancel"
)]
pub struct Cli {
    /// Override the parking API base URL
    #[arg(long, global = true, env = "PARKING_API_URL")]
    pub base_url: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Remaining monthly quota (landing page figure)
    Quota,
    /// Current usage and active issuance policy
    Usage,
    /// Currently valid permits
    Permits,
    /// Create a temporary permit
    Create(CreateArgs),
    /// Expire a permit now
    Cancel(CancelArgs),
    /// Liveness probe; does not contact the parking API
    Health,
}

#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// Vehicle license plate
    pub license_plate: String,

    /// ISO 8601 duration
    #[arg(long, default_value = parkline_client::DEFAULT_PERMIT_DURATION)]
    pub duration: String,

    /// Guest email for the permit notice
    #[arg(long)]
    pub email: Option<String>,

    /// Guest phone number for the permit notice
    #[arg(long)]
    pub phone: Option<String>,
}

#[derive(Parser, Debug)]
pub struct CancelArgs {
    /// Upstream permit id
    pub permit_id: String,
}
