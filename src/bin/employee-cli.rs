use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "employee-cli")]
#[command(about = "Management CLI for the employee service", long_about = None)]
struct Cli {
    #[arg(short, long, env = "EMPLOYEE_SERVICE_URL", default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every employee
    List,
    /// Show one employee
    Get { id: i64 },
    /// Find employees whose FIELD equals VALUE
    Search { field: String, value: String },
    /// Create an employee from a JSON document
    Create {
        #[arg(long)]
        json: String,
    },
    /// Replace an employee from a JSON document
    Update {
        id: i64,
        #[arg(long)]
        json: String,
    },
    /// Delete an employee
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::List => client.get(format!("{}/employees", base)),
        Commands::Get { id } => client.get(format!("{}/employees/{}", base, id)),
        Commands::Search { field, value } => {
            let mut url = reqwest::Url::parse(&format!("{}/employees/search", base))?;
            url.path_segments_mut()
                .map_err(|_| "service URL cannot be a base")?
                .push(&field)
                .push(&value);
            client.get(url)
        }
        Commands::Create { json } => {
            let body: Value = serde_json::from_str(&json)?;
            client.post(format!("{}/employees", base)).json(&body)
        }
        Commands::Update { id, json } => {
            let body: Value = serde_json::from_str(&json)?;
            client.put(format!("{}/employees/{}", base, id)).json(&body)
        }
        Commands::Delete { id } => client.delete(format!("{}/employees/{}", base, id)),
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: employee service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
