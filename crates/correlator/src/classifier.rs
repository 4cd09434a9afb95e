//! Heading → compass sector.
//!
//! Eight sectors on the cardinal and intercardinal points, half-open
//! `[start, end)`: a boundary angle belongs to the sector that starts there.
//! The table is the deployed one, so N spans 35° and NW 55°.

use contracts::CompassSector;

/// Lower bound of every sector after N, in compass order
const SECTOR_STARTS: [(u16, CompassSector); 7] = [
    (23, CompassSector::NE),
    (68, CompassSector::E),
    (113, CompassSector::SE),
    (158, CompassSector::S),
    (203, CompassSector::SW),
    (248, CompassSector::W),
    (293, CompassSector::NW),
];

/// Start of the northern sector's upper half
const NORTH_START: u16 = 348;

/// Classify a whole-degree heading. Values ≥ 360 wrap.
pub fn classify(heading: u16) -> CompassSector {
    let heading = heading % 360;
    if heading >= NORTH_START {
        return CompassSector::N;
    }
    SECTOR_STARTS
        .iter()
        .rev()
        .find(|(start, _)| heading >= *start)
        .map(|(_, sector)| *sector)
        .unwrap_or(CompassSector::N)
}
