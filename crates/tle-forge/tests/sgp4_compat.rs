//! Forged records must be accepted by an independent SGP4 TLE parser.

use chrono::{TimeZone, Utc};
use tle_forge::{
    BeltSpec, DragTerms, ForgeConfig, OrbitalParameters, SequentialIdentity, TleForger,
    TleRecord,
};

fn parse(record: &TleRecord) -> sgp4::Elements {
    sgp4::Elements::from_tle(
        Some(record.name.clone()),
        record.line1.as_bytes(),
        record.line2.as_bytes(),
    )
    .unwrap_or_else(|e| panic!("sgp4 rejected {}:\n{}\n{:?}", record.name, record, e))
}

#[test]
fn test_single_record_round_trips_through_sgp4() {
    let epoch = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();
    let params = OrbitalParameters::circular("ISS-like", 420_000.0, epoch)
        .with_eccentricity(0.0005)
        .with_inclination(51.64)
        .with_raan(247.46)
        .with_arg_perigee(130.54)
        .with_mean_anomaly(325.03);

    let record = TleForger::new().forge(&params).unwrap();
    let elements = parse(&record);

    assert!((elements.inclination - 51.64).abs() < 1e-9);
    assert!((elements.right_ascension - 247.46).abs() < 1e-9);
    assert!((elements.eccentricity - 0.0005).abs() < 1e-12);
    assert!((elements.argument_of_perigee - 130.54).abs() < 1e-9);
    assert!((elements.mean_anomaly - 325.03).abs() < 1e-9);
    assert!((elements.mean_motion - params.mean_motion()).abs() < 1e-8);
    assert_eq!(elements.norad_id, 0);
    let offset = elements.datetime - epoch.naive_utc();
    assert!(offset.num_milliseconds().abs() <= 1, "epoch off by {offset}");
}

#[test]
fn test_drag_terms_round_trip_through_sgp4() {
    let epoch = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let drag = DragTerms {
        mean_motion_dot: -0.00002182,
        mean_motion_ddot: 0.0,
        bstar: 2.8098e-5,
    };
    let mut forger = TleForger::new().with_config(ForgeConfig::strict().drag(drag));
    let record = forger
        .forge(&OrbitalParameters::circular("DRAG", 400_000.0, epoch).with_inclination(97.5))
        .unwrap();
    let elements = parse(&record);

    assert!((elements.mean_motion_dot - -0.00002182).abs() < 1e-12);
    assert_eq!(elements.mean_motion_ddot, 0.0);
    assert!(elements.drag_term > 0.0);
}

#[test]
fn test_belt_records_parse_with_sgp4() {
    let epoch = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let spec = BeltSpec::new(8, 6, 550.0, 53.0, epoch).with_eccentricity(0.0001);
    let mut forger = TleForger::with_identities(
        ForgeConfig::strict(),
        SequentialIdentity::new(90000, 2025, 1),
    );
    let belt = forger.forge_belt(&spec).unwrap();

    for (i, member) in belt.members.iter().enumerate() {
        let elements = parse(&member.record);
        assert_eq!(elements.norad_id, 90000 + i as u64);
        assert!((elements.right_ascension - member.raan_deg).abs() < 1e-4);
        assert!((elements.mean_anomaly - member.mean_anomaly_deg).abs() < 1e-4);
    }
}
