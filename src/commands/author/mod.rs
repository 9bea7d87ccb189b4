use anyhow::{Context, Result};
use console::style;

use crate::api::cfwidget::CfWidgetClient;
use crate::api::http::HttpContext;
use crate::models::config::InstallerConfig;
use crate::models::project::Author;

pub async fn run(config: &InstallerConfig, name: &str) -> Result<()> {
    let http = HttpContext::new(&config.http).context("Failed to initialize HTTP client")?;
    let client = CfWidgetClient::new(http, &config.endpoints.cfwidget);

    println!("🔍 Looking up author '{}'...", name);
    let Some(author) = client.fetch_author(name).await else {
        println!("{}", style("Author not found!").yellow());
        return Ok(());
    };

    print!("{}", format_projects(&author));
    println!("Found {} projects", style(author.projects.len()).bold());
    Ok(())
}

pub fn format_projects(author: &Author) -> String {
    let mut out = String::from("MOD_NAME | ID | INFERRED_URL\n----------------------------\n");
    for project in &author.projects {
        out.push_str(&format!("{} | {} | {}\n", project.name, project.id, project.url_slug()));
    }
    out
}
