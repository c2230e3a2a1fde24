//! A small command-line front-end for the tracker

use chrono::NaiveDate;

use week_tracker::client::Client;
use week_tracker::mock_api::MockTaskApi;
use week_tracker::storage::LocalStore;
use week_tracker::traits::TaskSource;
use week_tracker::utils::{print_week, print_weeks, today};
use week_tracker::week::{week_key, week_range, weeks_intersecting};
use week_tracker::App;

const USAGE: &str = "Usage:
    week-tracker week [YYYY-MM-DD]          show the ISO week of a date
    week-tracker month <year> <month>       show the weeks of a month
    week-tracker demo [--offline]           start a demo session and show this week and the next one
    week-tracker tasks <password> [date]    log in and show the tasks of a week

The task API is read from $WEEK_TRACKER_API_URL. Set RUST_LOG for more details.";


#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(|s| s.as_str()).collect();

    let result = match args.as_slice() {
        ["week"] => show_week(None),
        ["week", date] => show_week(Some(*date)),
        ["month", year, month] => show_month(year, month),
        ["demo"] => online_demo().await,
        ["demo", "--offline"] => offline_demo().await,
        ["tasks", password] => show_tasks(password, None).await,
        ["tasks", password, date] => show_tasks(password, Some(*date)).await,
        _ => {
            println!("{}", USAGE);
            Ok(())
        },
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn parse_date(date: &str) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    Ok(NaiveDate::parse_from_str(date, "%Y-%m-%d")?)
}

fn show_week(date: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let date = match date {
        None => today(),
        Some(d) => parse_date(d)?,
    };
    let range = week_range(date);
    println!("{}\t{}", week_key(date), range.label());
    Ok(())
}

fn show_month(year: &str, month: &str) -> Result<(), Box<dyn std::error::Error>> {
    let year: i32 = year.parse()?;
    let month: u32 = month.parse()?;
    if month == 0 || month > 12 {
        return Err(week_tracker::Error::InvalidMonth(month).into());
    }
    print_weeks(weeks_intersecting(year, month));
    Ok(())
}

fn local_store(client_url: &url::Url) -> LocalStore {
    let folder = week_tracker::config::data_folder();
    LocalStore::new(&folder, client_url)
}

async fn online_demo() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::from_config()?;
    let store = local_store(client.url());
    run_demo(App::new(client, store, today())).await
}

async fn offline_demo() -> Result<(), Box<dyn std::error::Error>> {
    let api = MockTaskApi::new(uuid::Uuid::new_v4().to_string());
    let store = local_store(&url::Url::parse("memory://offline")?);
    run_demo(App::new(api, store, today())).await
}

async fn run_demo<S: TaskSource>(app: App<S>) -> Result<(), Box<dyn std::error::Error>> {
    app.start_demo().await?;
    print_week(&app.state());

    if let Some(task) = app.state().tasks().first() {
        println!("\nCompleting \"{}\"...", task.name());
        app.toggle_complete(task.id()).await?;
        print_week(&app.state());
    }

    println!();
    app.next_week().await?;
    print_week(&app.state());

    app.logout_demo();
    Ok(())
}

async fn show_tasks(password: &str, date: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let date = match date {
        None => today(),
        Some(d) => parse_date(d)?,
    };
    let client = Client::from_config()?;
    let store = local_store(client.url());
    let app = App::new(client, store, date);

    if app.bootstrap().await.is_none() {
        app.login(password).await?;
    }
    print_week(&app.state());
    Ok(())
}
