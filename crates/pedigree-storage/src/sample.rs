//! Sample stable used for seeding and tests
//!
//! Sample records use negative ids so they never collide with ids handed
//! out by a backend.

use crate::error::StorageResult;
use crate::traits::StorageBackend;
use chrono::NaiveDate;
use pedigree_core::{Horse, HorseId, Owner, OwnerId, Sex};

/// Owners and horses of the sample stable
#[derive(Debug, Clone)]
pub struct SampleData {
    pub owners: Vec<Owner>,
    pub horses: Vec<Horse>,
}

fn owner(id: i64, first: &str, last: &str, email: Option<&str>) -> Owner {
    Owner {
        id: OwnerId(id),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.map(str::to_string),
    }
}

fn horse(id: i64, name: &str, (y, m, d): (i32, u32, u32), sex: Sex) -> Horse {
    let dob = NaiveDate::from_ymd_opt(y, m, d).expect("sample date must be a calendar date");
    Horse::new(id, name, dob, sex)
}

/// Build the sample stable
///
/// Three generations over eleven horses. Wendy (-1) heads the mare line and
/// Candy (-2) is a young stallion with no recorded parents.
pub fn sample_data() -> SampleData {
    let owners = vec![
        owner(-1, "Sarah", "Miller", Some("sarah.miller@example.com")),
        owner(-2, "Tom", "Becker", Some("tom.becker@example.org")),
        owner(-3, "Lena", "Huber", None),
    ];

    let horses = vec![
        horse(-1, "Wendy", (2005, 6, 1), Sex::Female)
            .with_description("The oldest mare of the stable")
            .with_owner(OwnerId(-1)),
        horse(-2, "Candy", (2020, 10, 10), Sex::Male).with_owner(OwnerId(-2)),
        horse(-3, "Bella", (2004, 4, 20), Sex::Female).with_owner(OwnerId(-3)),
        horse(-4, "Thunder", (2003, 6, 11), Sex::Male)
            .with_description("Grey stallion")
            .with_owner(OwnerId(-2)),
        horse(-5, "Luna", (2011, 4, 1), Sex::Female)
            .with_owner(OwnerId(-1))
            .with_mother(HorseId(-1))
            .with_father(HorseId(-4)),
        horse(-6, "Storm", (2010, 5, 17), Sex::Male)
            .with_owner(OwnerId(-2))
            .with_mother(HorseId(-3))
            .with_father(HorseId(-4)),
        horse(-7, "Gwendy", (2016, 3, 9), Sex::Female)
            .with_description("Wendy's granddaughter")
            .with_owner(OwnerId(-1))
            .with_mother(HorseId(-5))
            .with_father(HorseId(-6)),
        horse(-8, "Comet", (2015, 7, 23), Sex::Male)
            .with_owner(OwnerId(-3))
            .with_mother(HorseId(-3))
            .with_father(HorseId(-4)),
        horse(-9, "Pepper", (2019, 8, 30), Sex::Female)
            .with_mother(HorseId(-5))
            .with_father(HorseId(-8)),
        horse(-10, "Biscuit", (2023, 2, 12), Sex::Male)
            .with_owner(OwnerId(-1))
            .with_mother(HorseId(-7))
            .with_father(HorseId(-2)),
        horse(-11, "Hazel", (2024, 5, 5), Sex::Female)
            .with_owner(OwnerId(-3))
            .with_mother(HorseId(-9))
            .with_father(HorseId(-8)),
    ];

    SampleData { owners, horses }
}

/// Insert the sample stable into a backend, replacing records with the same ids
pub async fn load_sample_data<S: StorageBackend + ?Sized>(storage: &S) -> StorageResult<SampleData> {
    let data = sample_data();

    for owner in &data.owners {
        storage.insert_owner(owner).await?;
    }
    for horse in &data.horses {
        storage.insert_horse(horse).await?;
    }

    tracing::info!(
        owners = data.owners.len(),
        horses = data.horses.len(),
        "Loaded sample data"
    );
    Ok(data)
}
