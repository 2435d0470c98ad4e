use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "eventboard",
    version,
    about = "event dashboard reports",
    long_about = "Eventboard loads the event's dashboard.json, personas.json and full_dump.json and renders KPIs, the visitor directory, lodging and seating occupancy, contact lists and chart series.\n\nExamples:\n  eventboard\n  eventboard -q rojas -p 2\n  eventboard --section tables --floor 2\n  eventboard -s ./data/ -s https://iepaltohospicio.site/data/ -o dashboard.html\n\nTip: Use --config to persist sources and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'n',
        long = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the report to a file instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'A',
        long = "output-format",
        visible_alias = "of",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format (text, json, html)."
    )]
    pub output_format: Option<String>,

    #[arg(
        long = "section",
        value_name = "NAME",
        action = ArgAction::Append,
        help_heading = "Output",
        help = "Render only these sections (repeatable or comma-separated): summary, visitors, families, tables, contacts, charts."
    )]
    pub section: Vec<String>,

    #[arg(
        short = 's',
        long = "source",
        value_name = "DIR|URL",
        action = ArgAction::Append,
        help_heading = "Data",
        help = "Data source, tried in the order given (repeatable)."
    )]
    pub source: Vec<String>,

    #[arg(
        short = 'T',
        long = "timeout",
        value_name = "SECONDS",
        help_heading = "Data",
        help = "Per-request timeout in seconds."
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'C',
        long = "config",
        value_name = "FILE",
        help_heading = "Data",
        help = "Path to config file (defaults to ~/.eventboard/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        help_heading = "Data",
        help = "Write a commented default config file and exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'q',
        long = "query",
        value_name = "TEXT",
        help_heading = "Visitors",
        help = "Search visitors by name, church, family, table or role."
    )]
    pub query: Option<String>,

    #[arg(
        short = 'p',
        long = "page",
        value_name = "N",
        help_heading = "Visitors",
        help = "Visitor directory page (clamped to the available pages)."
    )]
    pub page: Option<usize>,

    #[arg(
        short = 'f',
        long = "floor",
        value_name = "N",
        allow_negative_numbers = true,
        help_heading = "Seating",
        help = "Show tables on one floor (falls back to all tables when the floor has none)."
    )]
    pub floor: Option<i64>,

    #[arg(
        short = 'e',
        long = "event-start",
        value_name = "DATETIME",
        help_heading = "Countdown",
        help = "Event start as YYYY-MM-DDTHH:MM:SS local time or RFC 3339."
    )]
    pub event_start: Option<String>,
}
