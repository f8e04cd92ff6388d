use anyhow::{Context, Result};
use serde::Serialize;
use splitride::recording::Ride;
use splitride::routes::Route;

use super::{find_route, Store};
use crate::cli::{DeleteRideArgs, DeleteRouteArgs};

#[derive(Serialize)]
struct Export {
    routes: Vec<Route>,
    rides: Vec<Ride>,
}

pub fn run(store: &Store) -> Result<()> {
    let export = Export {
        routes: store.db.list_routes()?,
        rides: store.db.list_rides()?,
    };

    let json = serde_json::to_string_pretty(&export).context("serializing export")?;
    println!("{json}");
    Ok(())
}

pub fn delete_ride(store: &Store, args: DeleteRideArgs) -> Result<()> {
    store.db.delete_ride(&args.id)?;
    println!("Deleted ride {}", args.id);
    Ok(())
}

pub fn delete_route(store: &Store, args: DeleteRouteArgs) -> Result<()> {
    let route = find_route(&store.db.list_routes()?, &args.route)?;
    let rides = store.db.count_rides(&route.id)?;
    store.db.delete_route(&route.id)?;
    println!("Deleted route '{}' and {} rides", route.name, rides);
    Ok(())
}
