//! Properties every forged record and belt must satisfy
//!
//! Each check returns `Err` with a human-readable reason so it can back both
//! `proptest!` blocks and the [`FuzzRunner`](crate::runner::FuzzRunner).

use tle_forge::encoder::{encode_checksum, encode_leading_zero_scientific};
use tle_forge::{
    Belt, BeltSpec, DragTerms, ForgeConfig, OrbitalParameters, SequentialIdentity, TleForger,
    TleRecord, LINE_DATA_WIDTH, LINE_WIDTH,
};

pub type Check = Result<(), String>;

/// Two element lines of 69 columns, each ending in its own checksum digit
pub fn check_record_shape(record: &TleRecord) -> Check {
    for (number, line) in [(1u8, &record.line1), (2, &record.line2)] {
        if !line.is_ascii() {
            return Err(format!("line {number} is not ASCII: {line:?}"));
        }
        let width = line.len();
        if width != LINE_WIDTH {
            return Err(format!("line {number} is {width} columns: {line:?}"));
        }
        if !line.starts_with(char::from(b'0' + number)) {
            return Err(format!("line {number} has the wrong line number: {line:?}"));
        }
        let expected = encode_checksum(&line[..LINE_DATA_WIDTH]);
        let actual = line.as_bytes()[LINE_DATA_WIDTH];
        if actual != b'0' + expected {
            return Err(format!(
                "line {number} checksum is {:?}, expected {expected}",
                actual as char
            ));
        }
    }
    if record.line1[2..7] != record.line2[2..7] {
        return Err("catalog numbers of line 1 and line 2 differ".to_string());
    }
    Ok(())
}

/// A record forges with the default forger and has a valid shape
pub fn check_forges(params: &OrbitalParameters) -> Check {
    let record = TleForger::new()
        .forge(params)
        .map_err(|e| format!("forge failed: {e}"))?;
    if record.name != params.name {
        return Err(format!("name {:?} became {:?}", params.name, record.name));
    }
    check_record_shape(&record)
}

/// The same inputs forge byte-identical text
pub fn check_deterministic(params: &OrbitalParameters) -> Check {
    let first = TleForger::new().forge(params).map_err(|e| e.to_string())?;
    let second = TleForger::new().forge(params).map_err(|e| e.to_string())?;
    if first != second {
        return Err(format!("forged twice, got:\n{first}\nand:\n{second}"));
    }
    Ok(())
}

/// Strict validation accepts in-range inputs and changes nothing
pub fn check_strict_agrees(params: &OrbitalParameters) -> Check {
    let permissive = TleForger::new().forge(params).map_err(|e| e.to_string())?;
    let strict = TleForger::new()
        .with_config(ForgeConfig::strict())
        .forge(params)
        .map_err(|e| format!("strict rejected an in-range input: {e}"))?;
    if permissive != strict {
        return Err(format!("strict output differs:\n{strict}\nvs:\n{permissive}"));
    }
    Ok(())
}

/// Representable drag terms forge under strict validation
pub fn check_with_drag(params: &OrbitalParameters, drag: &DragTerms) -> Check {
    let record = TleForger::new()
        .with_config(ForgeConfig::strict().drag(*drag))
        .forge(params)
        .map_err(|e| format!("drag terms {drag:?} rejected: {e}"))?;
    check_record_shape(&record)
}

/// The scientific token is 8 columns and decodes to within 1e-4 relative
pub fn check_scientific(value: f64) -> Check {
    let token = encode_leading_zero_scientific(value);
    if token.len() != 8 {
        return Err(format!("{value:e} encoded as {token:?}"));
    }
    let decoded = decode_scientific(&token).ok_or_else(|| format!("unparsable {token:?}"))?;
    let error = ((decoded - value) / value).abs();
    if error > 1e-4 {
        return Err(format!("{value:e} encoded as {token:?}, decodes to {decoded:e}"));
    }
    Ok(())
}

/// Read a ` MMMMM±E` token back as `±M.MMMM × 10^±E`
pub fn decode_scientific(token: &str) -> Option<f64> {
    let bytes = token.as_bytes();
    if bytes.len() != 8 {
        return None;
    }
    let sign = match bytes[0] {
        b' ' | b'+' => 1.0,
        b'-' => -1.0,
        _ => return None,
    };
    let mantissa: u32 = token.get(1..6)?.parse().ok()?;
    let exponent: i32 = token.get(6..8)?.parse().ok()?;
    Some(sign * mantissa as f64 / 10_000.0 * 10f64.powi(exponent))
}

fn forge_belt_with(spec: &BeltSpec, first_catalog: Option<u32>) -> Result<Belt, String> {
    match first_catalog {
        Some(first) => TleForger::with_identities(
            ForgeConfig::strict(),
            SequentialIdentity::new(first, 2025, 1),
        )
        .forge_belt(spec),
        None => TleForger::new().forge_belt(spec),
    }
    .map_err(|e| format!("belt failed: {e}"))
}

/// Belt size, plane-major order, naming and RAAN/anomaly spacing
pub fn check_belt_layout(spec: &BeltSpec) -> Check {
    let belt = forge_belt_with(spec, None)?;
    if belt.len() != spec.len() {
        return Err(format!("{} records, expected {}", belt.len(), spec.len()));
    }

    let step = spec.anomaly_step_deg();
    for (i, member) in belt.members.iter().enumerate() {
        let plane = i as u32 / spec.sats_per_plane;
        let slot = i as u32 % spec.sats_per_plane;
        if (member.plane_index, member.slot_index) != (plane, slot) {
            return Err(format!(
                "record {i} is plane {} slot {}, expected plane {plane} slot {slot}",
                member.plane_index, member.slot_index
            ));
        }

        let name = format!("{}_Plane_{}_Satellite_{}", spec.name, plane + 1, slot + 1);
        if member.record.name != name {
            return Err(format!("record {i} named {:?}, expected {name:?}", member.record.name));
        }

        let raan = plane as f64 * spec.plane_spacing_deg;
        let anomaly = slot as f64 * step;
        if (member.raan_deg - raan).abs() > 1e-9
            || (member.mean_anomaly_deg - anomaly).abs() > 1e-9
        {
            return Err(format!(
                "record {i} at RAAN {} / M {}, expected {raan} / {anomaly}",
                member.raan_deg, member.mean_anomaly_deg
            ));
        }
        check_record_shape(&member.record)?;
    }
    Ok(())
}

/// Sequential identities come out in belt order with no gaps
pub fn check_belt_catalog_numbers(spec: &BeltSpec, first_catalog: u32) -> Check {
    let belt = forge_belt_with(spec, Some(first_catalog))?;
    for (i, record) in belt.records().enumerate() {
        let expected = format!("{:05}", first_catalog as usize + i);
        if record.line1[2..7] != expected {
            return Err(format!(
                "record {i} has catalog {:?}, expected {expected}",
                &record.line1[2..7]
            ));
        }
    }
    Ok(())
}
