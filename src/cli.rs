use stay_calendar::Cli;

fn main() -> anyhow::Result<()> {
    Cli::run()
}
