//! Startup loading of magic bitboard tables.
//!
//! With the `load_magic` feature, tables are read from `orthogonal.json` /
//! `diagonal.json` next to the working directory (see `§6` persisted-state
//! format: 64 entries of `{mask, magic, shift, moves}`). Without it, tables
//! are generated on the fly, which is fast enough (well under a second) to
//! do at process startup and keeps the crate usable without any data files.

use std::fs;

use serde::{Deserialize, Serialize};

use super::precompute::{MagicTableSeed, generate_magic_tables};
use super::structs::{BishopMagicTables, MagicEntry, MagicTables, RookMagicTables};

#[derive(Serialize, Deserialize)]
struct PersistedEntry {
    mask: u64,
    magic: u64,
    shift: u8,
    moves: Vec<u64>,
}

#[derive(Serialize, Deserialize)]
struct PersistedTable {
    entries: Vec<PersistedEntry>,
}

impl From<&MagicEntry> for PersistedEntry {
    fn from(e: &MagicEntry) -> Self {
        PersistedEntry {
            mask: e.mask,
            magic: e.magic,
            shift: e.shift as u8,
            moves: e.table.to_vec(),
        }
    }
}

impl From<PersistedEntry> for MagicEntry {
    fn from(p: PersistedEntry) -> Self {
        MagicEntry {
            magic: p.magic,
            shift: p.shift as u32,
            mask: p.mask,
            table: p.moves.into_boxed_slice(),
        }
    }
}

fn write_table(path: &str, entries: &[MagicEntry]) -> std::io::Result<()> {
    let persisted = PersistedTable {
        entries: entries.iter().map(PersistedEntry::from).collect(),
    };
    let json = serde_json::to_string(&persisted).expect("serialize magic table");
    fs::write(path, json)
}

fn read_table(path: &str) -> std::io::Result<Vec<MagicEntry>> {
    let json = fs::read_to_string(path)?;
    let persisted: PersistedTable =
        serde_json::from_str(&json).expect("parse persisted magic table");
    Ok(persisted.entries.into_iter().map(MagicEntry::from).collect())
}

/// Writes the currently generated tables out to `orthogonal.json` and
/// `diagonal.json` so a later `load_magic`-enabled build can load them
/// without paying the generation cost.
pub fn persist_magic_tables(tables: &MagicTables) -> std::io::Result<()> {
    write_table("orthogonal.json", &tables.rook.entries)?;
    write_table("diagonal.json", &tables.bishop.entries)?;
    Ok(())
}

#[cfg(feature = "load_magic")]
pub fn load_magic_tables() -> MagicTables {
    let rook_entries =
        read_table("orthogonal.json").expect("orthogonal.json missing; run with --features load_magic after a generation pass");
    let bishop_entries =
        read_table("diagonal.json").expect("diagonal.json missing; run with --features load_magic after a generation pass");
    MagicTables {
        rook: RookMagicTables {
            entries: rook_entries,
        },
        bishop: BishopMagicTables {
            entries: bishop_entries,
        },
    }
}

#[cfg(not(feature = "load_magic"))]
pub fn load_magic_tables() -> MagicTables {
    let seed = if cfg!(feature = "deterministic_magic") {
        MagicTableSeed::Fixed(0x5EED_u64)
    } else {
        MagicTableSeed::Random
    };
    generate_magic_tables(seed).expect("magic table generation should always converge")
}
