//! Save/Load functionality for persisting boarding state
//!
//! Uses bincode for compact binary serialization. Station components are
//! captured in declaration order and respawned on load, so the layout's
//! behavioral ordering survives the round trip.

use hecs::World;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::components::{BoardingSession, CargoHold, PaxZone};
use crate::generation::CabinLayout;

/// Version number for save file format (increment when format changes)
const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of the boarding state
#[derive(Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    /// Cross-tick session bookkeeping
    pub session: BoardingSession,
    /// Passenger zones, in declaration order
    pub zones: Vec<PaxZone>,
    /// Cargo holds, in declaration order
    pub holds: Vec<CargoHold>,
}

/// State recovered from a save file
pub struct LoadedSession {
    pub session: BoardingSession,
    pub zones: Vec<PaxZone>,
    pub holds: Vec<CargoHold>,
}

/// Save the boarding state to a writer
pub fn save_session<W: Write>(
    writer: W,
    world: &World,
    layout: &CabinLayout,
    session: &BoardingSession,
) -> Result<(), SaveError> {
    let zones = layout
        .pax_zones
        .iter()
        .filter_map(|&e| world.get::<&PaxZone>(e).ok().map(|z| (*z).clone()))
        .collect();
    let holds = layout
        .cargo_holds
        .iter()
        .filter_map(|&e| world.get::<&CargoHold>(e).ok().map(|h| (*h).clone()))
        .collect();

    let save_data = SaveData {
        version: SAVE_VERSION,
        session: session.clone(),
        zones,
        holds,
    };

    bincode::serialize_into(writer, &save_data)?;
    Ok(())
}

/// Load boarding state from a reader
pub fn load_session<R: Read>(reader: R) -> Result<LoadedSession, SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    Ok(LoadedSession {
        session: save_data.session,
        zones: save_data.zones,
        holds: save_data.holds,
    })
}

/// Errors that can occur during save/load
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    VersionMismatch { expected: u32, found: u32 },
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "serialization error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(f, "save version mismatch: expected {expected}, found {found}")
            }
        }
    }
}

impl std::error::Error for SaveError {}
