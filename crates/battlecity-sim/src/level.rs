//! Level maps: 13x13 blocks of single-letter tokens.
//!
//! | token | meaning |
//! |---|---|
//! | `X` | empty |
//! | `B` | brick block (2x2 brick cells) |
//! | `T` | steel block (2x2 steel cells) |
//! | `R` | river |
//! | `S` | snow |
//! | `F` | forest |
//! | `E` | eagle (exactly one) |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use battlecity_core::components::Eagle;
use battlecity_core::constants::{BLOCK_SIZE, FIELD_BLOCKS};
use battlecity_core::enums::Material;

use crate::terrain::Terrain;

/// The classic first stage.
pub const STAGE_1: &str = "
X X X X X X X X X X X X X
X B X B X B X B X B X B X
X B X B X B X B X B X B X
X B X B X B T B X B X B X
X B X B X X X X X B X B X
F F X X X B X B X X X F F
T X B B X X X X X B B X T
S S X X X B X B X X X S S
X B X B X B B B X B X B X
X B X B X B X B X B X B X
X B X B R R X R R B X B X
X B X B X B B B X B X B X
X X X X X B E B X X X X X
";

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },
    #[error("row {row}: expected {expected} tokens, found {found}")]
    ColumnCount {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("row {row}, column {col}: unknown token {token:?}")]
    UnknownToken {
        row: usize,
        col: usize,
        token: String,
    },
    #[error("level has no eagle")]
    MissingEagle,
    #[error("row {row}, column {col}: second eagle")]
    DuplicateEagle { row: usize, col: usize },
    #[error("invalid level file: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk level format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelFile {
    pub name: String,
    pub map: Vec<String>,
}

/// A parsed level: initial terrain and eagle position.
#[derive(Debug, Clone)]
pub struct Level {
    pub name: String,
    pub terrain: Terrain,
    pub eagle: Eagle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tile {
    Empty,
    Terrain(Material),
    Eagle,
}

impl Tile {
    fn parse(token: &str) -> Option<Tile> {
        Some(match token {
            "X" => Tile::Empty,
            "B" => Tile::Terrain(Material::Brick),
            "T" => Tile::Terrain(Material::Steel),
            "R" => Tile::Terrain(Material::River),
            "S" => Tile::Terrain(Material::Snow),
            "F" => Tile::Terrain(Material::Forest),
            "E" => Tile::Eagle,
            _ => return None,
        })
    }
}

impl Level {
    /// Parse a whitespace-separated map. Blank lines are ignored.
    pub fn parse(name: &str, text: &str) -> Result<Level, LevelError> {
        let rows: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        Self::from_rows(name, &rows)
    }

    /// Parse a `LevelFile` JSON document.
    pub fn from_json(json: &str) -> Result<Level, LevelError> {
        let file: LevelFile = serde_json::from_str(json)?;
        let rows: Vec<&str> = file.map.iter().map(String::as_str).collect();
        Self::from_rows(&file.name, &rows)
    }

    pub fn stage_1() -> Result<Level, LevelError> {
        Self::parse("stage 1", STAGE_1)
    }

    fn from_rows(name: &str, rows: &[&str]) -> Result<Level, LevelError> {
        if rows.len() != FIELD_BLOCKS {
            return Err(LevelError::RowCount {
                expected: FIELD_BLOCKS,
                found: rows.len(),
            });
        }

        let mut terrain = Terrain::default();
        let mut eagle: Option<Eagle> = None;

        for (row, line) in rows.iter().enumerate() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != FIELD_BLOCKS {
                return Err(LevelError::ColumnCount {
                    row,
                    expected: FIELD_BLOCKS,
                    found: tokens.len(),
                });
            }
            for (col, token) in tokens.into_iter().enumerate() {
                let tile = Tile::parse(token).ok_or_else(|| LevelError::UnknownToken {
                    row,
                    col,
                    token: token.to_owned(),
                })?;
                match tile {
                    Tile::Empty => {}
                    Tile::Terrain(material) => terrain.fill(material, block_cells(material, row, col)),
                    Tile::Eagle => {
                        if eagle.is_some() {
                            return Err(LevelError::DuplicateEagle { row, col });
                        }
                        eagle = Some(Eagle {
                            x: col as f64 * BLOCK_SIZE,
                            y: row as f64 * BLOCK_SIZE,
                            broken: false,
                        });
                    }
                }
            }
        }

        Ok(Level {
            name: name.to_owned(),
            terrain,
            eagle: eagle.ok_or(LevelError::MissingEagle)?,
        })
    }
}

/// Cell indices of `material` covered by block `(row, col)`.
fn block_cells(material: Material, row: usize, col: usize) -> Vec<usize> {
    let n = material.cells_per_row();
    let per_block = n / FIELD_BLOCKS;
    let mut cells = Vec::with_capacity(per_block * per_block);
    for r in row * per_block..(row + 1) * per_block {
        for c in col * per_block..(col + 1) * per_block {
            cells.push(r * n + c);
        }
    }
    cells
}
