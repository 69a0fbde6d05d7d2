use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use time::{Date, OffsetDateTime};

use smartdiet::{
    auth,
    body::{self, HistoryFilter},
    catalog, chat,
    dates::{format_date, parse_date},
    meals::{self, MealType},
    nutrition,
    water::{self, ReminderSchedule},
    ApiClient, AppState, ClientError, ClientResult,
};

#[derive(Parser)]
#[command(name = "smartdiet", version, about = "Diet diary client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and keep the access token for later commands.
    Login {
        #[arg(long, env = "SMARTDIET_USER")]
        user: String,
        #[arg(long, env = "SMARTDIET_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    /// Print a reminder schedule without contacting the server.
    Schedule {
        #[arg(long, default_value = water::schedule::DEFAULT_WAKE_UP)]
        wake: String,
        #[arg(long, default_value = water::schedule::DEFAULT_SLEEP)]
        sleep: String,
        #[arg(long, default_value_t = water::schedule::DEFAULT_GAP_MINUTES, allow_negative_numbers = true)]
        gap: i64,
    },
    /// The saved water reminder schedule.
    Water,
    /// Calories consumed against the daily target.
    Summary {
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
    },
    /// Meals logged on a day.
    Meals {
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
    },
    /// Nutrition of one unit of a dish and its ingredients.
    Dish { id: String },
    /// Add grams of an ingredient to a meal.
    Log {
        #[arg(long)]
        meal: MealType,
        #[arg(long)]
        ingredient: String,
        #[arg(long)]
        grams: f64,
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
    },
    /// Ask the nutrition assistant a question; without one, list suggestions.
    Ask { prompt: Vec<String> },
    /// Weight change over a period.
    Weight {
        #[arg(long, value_enum, default_value_t = Period::Week)]
        period: Period,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Period {
    Week,
    Month,
    Year,
}

impl From<Period> for HistoryFilter {
    fn from(p: Period) -> Self {
        match p {
            Period::Week => HistoryFilter::Week,
            Period::Month => HistoryFilter::Month,
            Period::Year => HistoryFilter::Year,
        }
    }
}

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

fn print_schedule(schedule: &ReminderSchedule) {
    println!(
        "wake {}  sleep {}  every {} min",
        schedule.wake_up_time, schedule.sleep_time, schedule.reminder_gap
    );
    for slot in &schedule.schedule {
        println!("  {}  {}", slot.time, slot.amount);
    }
}

async fn print_dish(api: &ApiClient, id: &str) -> ClientResult<()> {
    let draft = catalog::edit_dish(api, id).await?;
    let totals = catalog::dish_nutrition(api, id).await?;
    println!("{}  {}", draft.name, totals.rounded(1));
    for c in &draft.components {
        println!("  {:<20} {:>6.0} g  {}", c.ingredient.name, c.grams, c.nutrition().rounded(1));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "smartdiet=debug".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();

    if let Command::Schedule { wake, sleep, gap } = &cli.command {
        let schedule = ReminderSchedule::generate(wake, sleep, *gap)?;
        print_schedule(&schedule);
        return Ok(());
    }

    let state = AppState::init().await?;
    let api = state.api.as_ref();

    let result = match cli.command {
        Command::Schedule { .. } => Ok(()),
        Command::Login { user, password } => auth::login(api, &user, &password).await.map(|claims| {
            let name = claims
                .and_then(|c| c.username.or(c.email))
                .unwrap_or_else(|| user.clone());
            println!("signed in as {name}");
        }),
        Command::Logout => {
            auth::logout(api).await;
            println!("signed out");
            Ok(())
        }
        Command::Water => water::load_schedule(api).await.map(|s| print_schedule(&s)),
        Command::Summary { date } => {
            meals::diary_summary(api, date.unwrap_or_else(today))
                .await
                .map(|summary| {
                    println!("{}", format_date(summary.date));
                    println!("consumed   {}", summary.consumed.rounded(1));
                    println!("target     {:.0} kcal", summary.target_calories);
                    println!("remaining  {:.0} kcal", summary.remaining_calories);
                    let t = summary.target_macros;
                    println!(
                        "macros     carbs {:.0} g | protein {:.0} g | fat {:.0} g | fiber {:.0} g",
                        t.carbs, t.protein, t.fat, t.fiber
                    );
                    for (meal_type, warning) in &summary.warnings {
                        println!("warning    {meal_type}: {warning}");
                    }
                })
        }
        Command::Meals { date } => meals::day_meals(api, date.unwrap_or_else(today))
            .await
            .map(|day| {
                if day.is_empty() {
                    println!("nothing logged");
                }
                for meal in &day {
                    println!("{:<10} {}", meal.meal_type, nutrition::aggregate(meal).rounded(1));
                }
                println!("{:<10} {}", "total", nutrition::sum_day(&day).rounded(1));
            }),
        Command::Dish { id } => print_dish(api, &id).await,
        Command::Log {
            meal,
            ingredient,
            grams,
            date,
        } => meals::log_ingredient(api, date.unwrap_or_else(today), meal, &ingredient, grams)
            .await
            .map(|()| println!("logged {grams} g to {meal}")),
        Command::Ask { prompt } if prompt.is_empty() => {
            for question in chat::SUGGESTED_QUESTIONS {
                println!("{question}");
            }
            Ok(())
        }
        Command::Ask { prompt } => chat::ask(api, &prompt.join(" ")).await.map(|reply| println!("{reply}")),
        Command::Weight { period } => body::weight_trend(api, period.into()).await.map(|trend| match trend {
            None => println!("no data"),
            Some(t) => {
                println!("start {:.1} kg  current {:.1} kg  change {:+.1} kg", t.start, t.current, t.change);
                for entry in &t.newest_first {
                    println!("  {}  {:.1} kg", entry.created_at, entry.weight);
                }
            }
        }),
    };

    match result {
        Err(e @ (ClientError::SessionExpired | ClientError::NotAuthenticated)) => {
            Err(e).context("run `smartdiet login` first")
        }
        Err(e) => Err(anyhow::anyhow!(e.user_message())),
        Ok(()) => Ok(()),
    }
}
