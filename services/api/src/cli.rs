use crate::report::{run_dashboard, run_mentor_detail, DashboardArgs, MentorArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use mentor_kpi::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Mentor KPI Dashboard",
    about = "Serve the mentor KPI API or print dashboard reports from a stored snapshot",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the category distribution for one rubric
    Dashboard(DashboardArgs),
    /// Print the detail summary for a single mentor
    Mentor(MentorArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Dashboard(args) => run_dashboard(args),
        Command::Mentor(args) => run_mentor_detail(args),
    }
}
