//! Walks the coordinator through a donor and a hospital session against the
//! in-memory backend seeded from `fixtures/demo.json`.

use std::sync::Arc;

use anyhow::Context;
use serde::Deserialize;

use bloodlink_client::memory::{
    FixedGeolocation, InMemoryCandidateStore, InMemoryGeocoder, InMemoryProfileStore,
};
use bloodlink_client::{ClientConfig, Coordinator, Discovery, Place, Ports, Profile};
use bloodlink_discovery::{BloodGroup, CandidateKind, CandidateRecord};
use bloodlink_geo::GeoPoint;

const FIXTURE: &str = include_str!("../../fixtures/demo.json");

#[derive(Deserialize)]
struct Fixture {
    device: GeoPoint,
    places: Vec<Place>,
    profiles: Vec<Profile>,
    donors: Vec<CandidateRecord>,
    hospitals: Vec<CandidateRecord>,
    blood_banks: Vec<CandidateRecord>,
}

fn print_discovery(title: &str, discovery: &Discovery) {
    println!("== {title}");
    match discovery {
        Discovery::Redirected { decision } => println!("   redirected: {decision:?}"),
        Discovery::Results { outcome, .. } => {
            if outcome.is_empty() {
                println!("   no matches");
            }
            for ranked in &outcome.results {
                let distance = ranked.distance_label().unwrap_or_else(|| "distance unknown".into());
                println!("   {:<32} {distance}", ranked.candidate.display_name);
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    bloodlink_observability::init();

    let fixture: Fixture = serde_json::from_str(FIXTURE).context("parsing demo fixture")?;

    let profiles = Arc::new(InMemoryProfileStore::new());
    let candidates = Arc::new(InMemoryCandidateStore::new());
    let geocoder = Arc::new(InMemoryGeocoder::new());

    for profile in fixture.profiles {
        profiles.insert(profile);
    }
    for (kind, rows) in [
        (CandidateKind::Donor, fixture.donors),
        (CandidateKind::Hospital, fixture.hospitals),
        (CandidateKind::BloodBank, fixture.blood_banks),
    ] {
        for row in rows {
            candidates.insert(row.into_candidate(kind));
        }
    }
    for place in fixture.places {
        geocoder.add_place(place.address, place.point);
    }

    let coordinator = Coordinator::new(
        ClientConfig::from_env(),
        Ports {
            profiles: profiles.clone(),
            candidates,
            geolocation: Arc::new(FixedGeolocation::at(fixture.device)),
            geocoder,
        },
    );

    let anonymous = coordinator
        .discover(CandidateKind::Donor, &coordinator.default_filters(CandidateKind::Donor))
        .await?;
    print_discovery("anonymous donor search", &anonymous);

    let location = coordinator.refresh_location().await?;
    println!("== location: {}", serde_json::to_string(&location)?);

    let donor = profiles
        .get("0190d5a0-0000-7000-8000-00000000d001".parse()?)
        .context("donor profile missing from fixture")?;
    let status = coordinator.sign_in(donor.id).await?;
    println!("== donor signed in: {status:?}");

    let filters = coordinator
        .default_filters(CandidateKind::Donor)
        .blood_group(BloodGroup::OPos)
        .available_only();
    let nearby = coordinator.discover(CandidateKind::Donor, &filters).await?;
    print_discovery("available O+ donors within the default radius", &nearby);

    let banks = coordinator
        .discover(CandidateKind::BloodBank, &coordinator.default_filters(CandidateKind::BloodBank))
        .await?;
    print_discovery("blood banks", &banks);

    coordinator.sign_out();

    let hospital = profiles
        .get("0190d5a0-0000-7000-8000-00000000b001".parse()?)
        .context("hospital profile missing from fixture")?;
    let status = coordinator.sign_in(hospital.id).await?;
    println!("== hospital signed in: {status:?}");

    let decision = coordinator.navigate("adminDashboard");
    println!("== hospital opens adminDashboard: {decision:?}");

    let nav: Vec<&str> = coordinator.navigation().iter().map(|item| item.label).collect();
    println!("== hospital navigation: {}", nav.join(" | "));

    Ok(())
}
