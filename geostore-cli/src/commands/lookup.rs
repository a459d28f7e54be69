//! Reference data lookups.

use geostore::reference::CityInfo;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Print the country containing the coordinate.
pub fn country(runner: &CliRunner, lat: f64, lon: f64) -> Result<(), CliError> {
    let service = runner.create_service()?;
    let found = runner.block_on(service.resolver().resolve_country(
        lat,
        lon,
        runner.cancel_token(),
    ))?;

    match found {
        Some(country) if country.iso_code.is_empty() => println!("{}", country.display_name()),
        Some(country) => println!("{} ({})", country.display_name(), country.iso_code),
        None => println!("No country contains ({}, {})", lat, lon),
    }
    Ok(())
}

/// Print the closest city within `max_km` (or the configured radius).
pub fn nearest_city(
    runner: &CliRunner,
    lat: f64,
    lon: f64,
    max_km: Option<f64>,
) -> Result<(), CliError> {
    let max_km = max_km.unwrap_or(runner.config().reference.city_radius_km);
    let service = runner.create_service()?;
    let found = runner.block_on(service.resolver().resolve_nearest_city(
        lat,
        lon,
        max_km,
        runner.cancel_token(),
    ))?;

    match found {
        Some(city) => println!("{}", describe_city(&city)),
        None => println!("No city within {} km of ({}, {})", max_km, lat, lon),
    }
    Ok(())
}

/// Print cities whose name contains `query`.
pub fn search_cities(runner: &CliRunner, query: &str, limit: usize) -> Result<(), CliError> {
    let service = runner.create_service()?;
    let cities = runner.block_on(service.resolver().search_cities_by_name(
        query,
        limit,
        runner.cancel_token(),
    ))?;

    if cities.is_empty() {
        println!("No cities match '{}'", query);
    }
    for city in &cities {
        println!("{}", describe_city(city));
    }
    Ok(())
}

/// Report whether the reference source answers.
pub fn probe(runner: &CliRunner) -> Result<(), CliError> {
    let service = runner.create_service()?;
    let url = &runner.config().reference.countries_url;

    if runner.block_on(service.reference_available()) {
        println!("Reference source reachable: {}", url);
    } else {
        println!("Reference source NOT reachable: {}", url);
    }
    Ok(())
}

fn describe_city(city: &CityInfo) -> String {
    let mut line = city.name.clone();
    if !city.country.is_empty() {
        line.push_str(&format!(", {}", city.country));
    }
    line.push_str(&format!(
        " [{:.4}, {:.4}]",
        city.location.latitude(),
        city.location.longitude()
    ));
    if let Some(population) = city.population {
        line.push_str(&format!(" pop. {}", population));
    }
    if let Some(distance) = city.distance_km {
        line.push_str(&format!(" - {:.1} km", distance));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use geostore::coord::GeoPoint;

    #[test]
    fn test_describe_city_full() {
        let city = CityInfo {
            name: "Moscow".to_string(),
            country: "Russia".to_string(),
            location: GeoPoint::new(55.7522, 37.6156).unwrap(),
            population: Some(12_000_000),
            distance_km: Some(2.345),
        };
        assert_eq!(
            describe_city(&city),
            "Moscow, Russia [55.7522, 37.6156] pop. 12000000 - 2.3 km"
        );
    }

    #[test]
    fn test_describe_city_minimal() {
        let city = CityInfo {
            name: "Tiny".to_string(),
            country: String::new(),
            location: GeoPoint::new(1.0, 2.0).unwrap(),
            population: None,
            distance_km: None,
        };
        assert_eq!(describe_city(&city), "Tiny [1.0000, 2.0000]");
    }
}
