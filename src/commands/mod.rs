pub mod boards;
pub mod export;
pub mod ride;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use splitride::routes::Route;
use splitride::storage::config::{
    get_config_path, load_config, load_config_from, save_config, save_config_to, AppConfig,
};
use splitride::storage::database::Database;
use uuid::Uuid;

/// Loaded configuration plus the open database.
pub struct Store {
    pub config: AppConfig,
    pub db: Database,
}

impl Store {
    /// Load config and open (and seed) the database.
    pub fn open(data_dir: Option<PathBuf>) -> Result<Self> {
        // First run writes the defaults so they can be edited.
        let config = match data_dir {
            Some(dir) => {
                let path = dir.join("config.toml");
                let config = load_config_from(&path, dir)?;
                if !path.exists() {
                    save_config_to(&config, &path)?;
                }
                config
            }
            None => {
                let config = load_config()?;
                if !get_config_path().exists() {
                    save_config(&config)?;
                }
                config
            }
        };

        let path = config.database_path();
        let mut db = Database::open(&path)
            .with_context(|| format!("opening database {}", path.display()))?;
        db.seed_example_route()?;

        Ok(Self { config, db })
    }
}

/// Resolve a route by ID, 1-based list number, or case-insensitive name.
pub fn find_route(routes: &[Route], query: &str) -> Result<Route> {
    let query = query.trim();

    if let Ok(id) = Uuid::parse_str(query) {
        if let Some(route) = routes.iter().find(|r| r.id == id) {
            return Ok(route.clone());
        }
    }

    if let Ok(n) = query.parse::<usize>() {
        if let Some(route) = n.checked_sub(1).and_then(|i| routes.get(i)) {
            return Ok(route.clone());
        }
    }

    let matches: Vec<&Route> = routes
        .iter()
        .filter(|r| r.name.to_lowercase().contains(&query.to_lowercase()))
        .collect();

    match matches.as_slice() {
        [route] => Ok((*route).clone()),
        [] => bail!("no route matches '{query}'"),
        _ => bail!("'{query}' matches {} routes; use the list number", matches.len()),
    }
}
