use clap::{Parser, Subcommand};

/// Command-line interface definition for rTripClock
#[derive(Parser)]
#[command(
    name = "rtripclock",
    version = env!("CARGO_PKG_VERSION"),
    about = "Driver clock sessions from pre/post-trip checklists, timecards and route stop grouping",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view, check, upgrade or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields with default values")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Submit a vehicle checklist (pre-trip clocks in, post-trip clocks out)
    Checklist {
        /// Driver identifier
        driver: String,

        #[arg(long = "kind", help = "Checklist kind: pre | post (pre-trip / post-trip)")]
        kind: String,

        #[arg(
            long = "at",
            help = "Submission time (RFC 3339 or 'YYYY-MM-DD HH:MM' local); default now"
        )]
        at: Option<String>,

        #[arg(long = "vehicle", help = "Vehicle identifier")]
        vehicle: Option<String>,

        #[arg(long = "item", help = "Inspection item as name=pass|fail (repeatable)")]
        items: Vec<String>,

        #[arg(long = "notes", help = "Free text notes")]
        notes: Option<String>,
    },

    /// List a driver's work sessions
    Sessions {
        /// Driver identifier
        driver: String,

        #[arg(
            long,
            short,
            help = "YYYY, YYYY-MM, YYYY-MM-DD or a range A:B (default: current month)"
        )]
        period: Option<String>,

        #[arg(long = "details", help = "Show the checklists of each session")]
        details: bool,
    },

    /// Show daily, weekly or range totals for a driver
    Total {
        /// Driver identifier
        driver: String,

        #[arg(
            long = "date",
            conflicts_with_all = ["week", "from", "to"],
            help = "Daily total for this business date (default: today)"
        )]
        date: Option<String>,

        #[arg(
            long = "week",
            conflicts_with_all = ["from", "to"],
            help = "Timecard of the configured week containing this date"
        )]
        week: Option<String>,

        #[arg(long = "from", requires = "to", help = "Timecard range start (YYYY-MM-DD)")]
        from: Option<String>,

        #[arg(long = "to", requires = "from", help = "Timecard range end (YYYY-MM-DD)")]
        to: Option<String>,

        #[arg(long = "now", hide = true, help = "Evaluate open sessions at this instant")]
        now: Option<String>,

        #[arg(long = "json", help = "Print JSON instead of a table")]
        json: bool,
    },

    /// Group the stops of a route by household and school
    Route {
        #[arg(long, value_name = "FILE", help = "JSON array of route stops")]
        file: String,

        #[arg(long = "json", help = "Print JSON instead of a table")]
        json: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, help = "Overwrite an existing backup file")]
        force: bool,
    },
}
