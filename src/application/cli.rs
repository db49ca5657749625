use crate::application::{CalendarApp, Config, OptionsFile, PickerResult, Sources};
use crate::entities::{Locale, SelectionMode};
use crate::infrastructure::{FileLogger, HolidayLanguage, JapanHolidays};
use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stay-calendar")]
#[command(about = "A terminal date picker for stays and bookings")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub args: CalendarArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Flags shared by every subcommand; they override the options file.
#[derive(Args, Debug, Default)]
pub struct CalendarArgs {
    /// Options file (defaults to options.json in the config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Months shown side by side (1 or 2)
    #[arg(short, long, global = true)]
    pub months: Option<u8>,

    /// Selection mode: single, range or multiple
    #[arg(long, global = true)]
    pub mode: Option<SelectionMode>,

    /// Locale tag such as ja-JP or en-US
    #[arg(long, global = true)]
    pub locale: Option<Locale>,

    /// First day of the week (0 = Sunday)
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub start_week_on: Option<i32>,

    /// Earliest selectable date (YYYY-MM-DD, defaults to today)
    #[arg(long, global = true)]
    pub min_date: Option<NaiveDate>,

    /// Latest selectable date (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub max_date: Option<NaiveDate>,

    /// Month to show first (YYYY-MM-DD, defaults to today)
    #[arg(short, long, global = true)]
    pub date: Option<NaiveDate>,

    /// Availability payload (JSON)
    #[arg(long, global = true)]
    pub availability: Option<PathBuf>,

    /// Mark the built-in national holidays
    #[arg(long, global = true)]
    pub holidays: bool,

    /// Holiday table (JSON object of date to name) instead of the built-in rules
    #[arg(long, global = true)]
    pub holiday_file: Option<PathBuf>,

    /// Show the selection summary above the months
    #[arg(long, global = true)]
    pub info: bool,

    /// Color theme: dark, light or minimal
    #[arg(long, global = true)]
    pub theme: Option<String>,

    /// Append every calendar event to this file as JSON lines
    #[arg(long, global = true)]
    pub events: Option<PathBuf>,

    /// Write debug logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pick dates interactively and print the selection as JSON
    Pick,
    /// Print the displayed months as text
    Print {
        /// Keep terminal colors in the output
        #[arg(long)]
        color: bool,
    },
    /// List the built-in holidays of a year
    Holidays {
        /// Year to list (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
        /// Holiday name language: ja or en
        #[arg(short, long)]
        language: Option<HolidayLanguage>,
    },
}

impl CalendarArgs {
    /// Layer the flags over values read from the options file.
    pub fn apply(&self, options: &mut OptionsFile) {
        if let Some(months) = self.months {
            options.shown_months = Some(months);
        }
        if let Some(mode) = self.mode {
            options.selection_mode = Some(mode);
        }
        if let Some(locale) = self.locale {
            options.locale = Some(locale);
        }
        if let Some(day) = self.start_week_on {
            options.start_week_on = Some(day);
        }
        if let Some(date) = self.min_date {
            options.min_date = Some(date);
        }
        if let Some(date) = self.max_date {
            options.max_date = Some(date);
        }
        if let Some(date) = self.date {
            options.initial_date = Some(date);
        }
        if self.holidays {
            options.enable_holidays = Some(true);
        }
        if self.info {
            options.has_info = Some(true);
        }
        if let Some(theme) = &self.theme {
            options.theme = Some(theme.clone());
        }
    }

    fn sources(&self) -> Sources {
        Sources {
            availability: self.availability.clone(),
            holidays: self.holiday_file.clone(),
            events: self.events.clone(),
        }
    }
}

impl Cli {
    pub fn run() -> Result<()> {
        let cli = Self::parse();
        let config = Config::from_env();

        if let Some(path) = cli.args.log_file.as_ref().or(config.log_file.as_ref()) {
            FileLogger::open(path, LevelFilter::Debug)?.install()?;
        }

        let mut options = match &cli.args.config {
            Some(path) => OptionsFile::load(path)?,
            None => config.load_options()?,
        };
        cli.args.apply(&mut options);

        match cli.command {
            Some(Commands::Print { color }) => {
                let app = CalendarApp::new(&config, options, cli.args.sources())?;
                print!("{}", app.print(color));
            }
            Some(Commands::Holidays { year, language }) => {
                let year = year.unwrap_or_else(|| Local::now().year());
                let language = language.unwrap_or_else(|| {
                    HolidayLanguage::for_locale(options.locale.unwrap_or_default())
                });
                for (date, name) in JapanHolidays::new(language).holidays_in_year(year) {
                    println!("{}  {}", date.format("%Y-%m-%d"), name);
                }
            }
            Some(Commands::Pick) | None => {
                let mut app = CalendarApp::new(&config, options, cli.args.sources())?;
                let result = app.pick()?;
                let (status, selection) = match result {
                    PickerResult::Confirmed(selection) => ("confirmed", selection),
                    PickerResult::Cancelled(selection) => ("cancelled", selection),
                };
                log::info!("picker closed: {} {:?}", status, selection);
                println!(
                    "{}",
                    serde_json::json!({ "status": status, "selection": selection })
                );
            }
        }

        Ok(())
    }
}
