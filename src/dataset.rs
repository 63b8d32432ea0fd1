use crate::models::{Announcement, Resident};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::Path;

pub fn load_residents(path: &Path) -> Result<Vec<Resident>, String> {
    let residents: Vec<Resident> = read_csv(path)?;
    let mut ids = HashSet::new();
    for resident in &residents {
        if !ids.insert(resident.id) {
            return Err(format!("duplicate resident id {} in {}", resident.id, path.display()));
        }
        if resident.amount == 0 {
            return Err(format!("resident {} has a zero billed amount", resident.id));
        }
    }
    log::info!("loaded {} residents from {}", residents.len(), path.display());
    Ok(residents)
}

pub fn load_announcements(path: &Path) -> Result<Vec<Announcement>, String> {
    let announcements: Vec<Announcement> = read_csv(path)?;
    let mut ids = HashSet::new();
    for announcement in &announcements {
        if !ids.insert(announcement.id) {
            return Err(format!(
                "duplicate announcement id {} in {}",
                announcement.id,
                path.display()
            ));
        }
    }
    log::info!(
        "loaded {} announcements from {}",
        announcements.len(),
        path.display()
    );
    Ok(announcements)
}

fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, String> {
    let mut reader = csv::Reader::from_path(path).map_err(|err| err.to_string())?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: T = result.map_err(|err| err.to_string())?;
        rows.push(row);
    }
    Ok(rows)
}
