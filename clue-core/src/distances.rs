use clue_types::GameError;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

pub const MIN_DISTANCE: i32 = 1;
pub const MAX_DISTANCE: i32 = 10;

/// Symmetric travel costs between the places of a room.
///
/// A complete graph with direct weights: `distance(i, j)` is the stored
/// edge, not a shortest path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distances {
    dist: Vec<Vec<i32>>,
}

impl Distances {
    /// Random table with a zero diagonal and weights in `[1, 10]` elsewhere
    pub fn generate<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Self {
        let mut dist = vec![vec![0; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let weight = rng.gen_range(MIN_DISTANCE..=MAX_DISTANCE);
                dist[i][j] = weight;
                dist[j][i] = weight;
            }
        }
        Self { dist }
    }

    pub fn from_matrix(dist: Vec<Vec<i32>>) -> Result<Self, GameError> {
        let n = dist.len();
        if let Some(row) = dist.iter().position(|row| row.len() != n) {
            return Err(GameError::CorruptRecord {
                reason: format!("distance row {} has {} columns, expected {}", row, dist[row].len(), n),
            });
        }
        Ok(Self { dist })
    }

    pub fn len(&self) -> usize {
        self.dist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dist.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<i32> {
        self.dist.get(i).and_then(|row| row.get(j)).copied()
    }

    /// Panics when either index is outside the table
    pub fn distance(&self, i: usize, j: usize) -> i32 {
        self.dist[i][j]
    }
}

/// Rows joined by `\n`, values by `,`
impl fmt::Display for Distances {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.dist.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{}", value)?;
            }
        }
        Ok(())
    }
}

impl FromStr for Distances {
    type Err = GameError;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        if src.trim().is_empty() {
            return Ok(Self { dist: Vec::new() });
        }

        let dist = src
            .split('\n')
            .map(|line| {
                line.split(',')
                    .map(|value| {
                        value.trim().parse::<i32>().map_err(|e| GameError::CorruptRecord {
                            reason: format!("bad distance '{}': {}", value, e),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_matrix(dist)
    }
}
