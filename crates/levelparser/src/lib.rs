use std::str::FromStr;

use glam::{vec2, Vec2};
use serde::{Deserialize, Serialize};
use stringlit::s;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(try_from = "Vec<f32>", into = "Vec<f32>")]
pub struct Spawn {
    pub position: Vec2, // In grid units
    pub angle: Option<f32>, // In degrees
}

impl TryFrom<Vec<f32>> for Spawn {
    type Error = String;

    fn try_from(value: Vec<f32>) -> Result<Self, Self::Error> {
        match value.as_slice() {
            [x, y] => Ok(Spawn {
                position: vec2(*x, *y),
                angle: None,
            }),
            [x, y, angle] => Ok(Spawn {
                position: vec2(*x, *y),
                angle: Some(*angle),
            }),
            _ => Err(format!(
                "A spawn needs two or three values, got {}",
                value.len()
            )),
        }
    }
}

impl From<Spawn> for Vec<f32> {
    fn from(spawn: Spawn) -> Self {
        let mut values = vec![spawn.position.x, spawn.position.y];
        values.extend(spawn.angle);
        values
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Structure {
    Wall {
        coords: [f32; 4], // x1, y1, x2, y2 in grid units
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<[u8; 4]>,
    },
}

impl Structure {
    pub fn coords(&self) -> [f32; 4] {
        match self {
            Structure::Wall { coords, .. } => *coords,
        }
    }
}

/// A flat billboard standing in the level.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SpriteSpec {
    pub id: u32,
    pub position: [f32; 2], // In grid units
    pub width: f32,         // In grid units
    #[serde(default)]
    pub angle: f32, // Facing, in degrees
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Level {
    pub dimensions: [f32; 2],
    pub spawn: Spawn,
    pub structures: Vec<Structure>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sprites: Vec<SpriteSpec>,
}

impl Level {
    pub fn from_json(s: &str) -> Result<Self, String> {
        serde_json::from_str(s).map_err(|e| format!("Could not parse level: {e}"))
    }

    pub fn width(&self) -> f32 {
        self.dimensions[0]
    }

    pub fn height(&self) -> f32 {
        self.dimensions[1]
    }

    /// Keeps every structure endpoint inside `[0, dimension]`, one scalar at a time.
    pub fn clamp_structures(&mut self) {
        let [width, height] = self.dimensions;
        for structure in &mut self.structures {
            match structure {
                Structure::Wall { coords, .. } => {
                    let [sx, sy, ex, ey] = *coords;
                    *coords = [
                        sx.clamp(0.0, width.max(0.0)),
                        sy.clamp(0.0, height.max(0.0)),
                        ex.clamp(0.0, width.max(0.0)),
                        ey.clamp(0.0, height.max(0.0)),
                    ];
                }
            }
        }
    }
}

fn parse_numbers<const N: usize>(i: usize, what: &str, s: &str) -> Result<[f32; N], String> {
    let values = s
        .split(',')
        .map(|v| {
            v.trim().parse::<f32>().map_err(|e| {
                format!("Error in line {i}! {what} contains an invalid number: {e}")
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    values.try_into().map_err(|v: Vec<f32>| {
        format!("Error in line {i}! {what} needs {N} values, got {}", v.len())
    })
}

fn parse_color(i: usize, s: &str) -> Result<[u8; 4], String> {
    let values = s
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<u8>()
                .map_err(|e| format!("Error in line {i}! Wall color is not valid: {e}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    match values.as_slice() {
        [r, g, b] => Ok([*r, *g, *b, 255]),
        [r, g, b, a] => Ok([*r, *g, *b, *a]),
        _ => Err(format!("Error in line {i}! Wall color needs 3 or 4 values")),
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut dimensions = None;
        let mut spawn = Spawn {
            position: vec2(1.0, 1.0),
            angle: None,
        };
        let mut structures = Vec::new();
        let mut sprites = Vec::new();

        for (i, line) in s.lines().enumerate() {
            let i = i + 1;
            if line.trim().is_empty() || line.trim().starts_with('#') {
                continue;
            }
            let Some((left, right)) = line.split_once(':') else {
                return Err(format!("Error in line {i}! Invalid line: {line}"));
            };
            match left.trim().to_uppercase().as_str() {
                "DI" => {
                    let [w, h] = parse_numbers::<2>(i, "Dimensions", right)?;
                    if w <= 0.0 || h <= 0.0 {
                        return Err(format!("Error in line {i}! Dimensions must be positive"));
                    }
                    dimensions = Some([w, h]);
                }
                "SP" => {
                    let (position, angle) = match right.split_once(';') {
                        Some((position, angle)) => (
                            position,
                            Some(angle.trim().parse::<f32>().map_err(|e| {
                                format!("Error in line {i}! Spawn angle is not a valid number. {e}")
                            })?),
                        ),
                        None => (right, None),
                    };
                    let [x, y] = parse_numbers::<2>(i, "Spawn", position)?;
                    spawn = Spawn {
                        position: vec2(x, y),
                        angle,
                    };
                }
                "WA" => {
                    let (coords, color) = match right.split_once(';') {
                        Some((coords, color)) => (coords, Some(parse_color(i, color)?)),
                        None => (right, None),
                    };
                    let coords = parse_numbers::<4>(i, "Wall", coords)?;
                    structures.push(Structure::Wall { coords, color });
                }
                "SO" => {
                    let (values, angle) = match right.split_once(';') {
                        Some((values, angle)) => (
                            values,
                            angle.trim().parse::<f32>().map_err(|e| {
                                format!("Error in line {i}! Sprite angle is not a number. {e}")
                            })?,
                        ),
                        None => (right, 0.0),
                    };
                    let [id, x, y, width] = parse_numbers::<4>(i, "Sprite", values)?;
                    if id < 0.0 || id.fract() != 0.0 {
                        return Err(format!("Error in line {i}! Sprite id must be a whole number"));
                    }
                    sprites.push(SpriteSpec {
                        id: id as u32,
                        position: [x, y],
                        width,
                        angle,
                    });
                }
                _ => return Err(format!("Error in line {i}! Unknown key: {}", left.trim())),
            }
        }

        let dimensions = dimensions.ok_or_else(|| s!("Level is missing its dimensions (DI)"))?;

        Ok(Level {
            dimensions,
            spawn,
            structures,
            sprites,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEV: &str = "\
# dev level
DI: 16, 16
SP: 1.5, 4.5; 90
WA: 0,0,16,0
WA: 2,2,6,6; 200,40,40
";

    #[test]
    fn parses_text_levels() {
        let level: Level = DEV.parse().unwrap();
        assert_eq!(level.dimensions, [16.0, 16.0]);
        assert_eq!(level.spawn.position, vec2(1.5, 4.5));
        assert_eq!(level.spawn.angle, Some(90.0));
        assert_eq!(level.structures.len(), 2);
        assert_eq!(
            level.structures[1],
            Structure::Wall {
                coords: [2.0, 2.0, 6.0, 6.0],
                color: Some([200, 40, 40, 255]),
            }
        );
    }

    #[test]
    fn reports_the_failing_line() {
        let err = "DI: 4,4\nWA: 1,2,x,4".parse::<Level>().unwrap_err();
        assert!(err.starts_with("Error in line 2!"), "{err}");

        let err = "WA: 1,2,3,4".parse::<Level>().unwrap_err();
        assert!(err.contains("dimensions"), "{err}");

        let err = "DI: 4,4\nXX: 1".parse::<Level>().unwrap_err();
        assert!(err.contains("Unknown key"), "{err}");
    }

    #[test]
    fn parses_json_levels() {
        let level = Level::from_json(
            r#"{
                "dimensions": [10, 8],
                "spawn": [2, 3],
                "structures": [{ "type": "wall", "coords": [0, 0, 10, 0] }]
            }"#,
        )
        .unwrap();
        assert_eq!(level.dimensions, [10.0, 8.0]);
        assert_eq!(level.spawn.angle, None);
        assert_eq!(level.structures[0].coords(), [0.0, 0.0, 10.0, 0.0]);

        assert!(Level::from_json(r#"{"dimensions":[1,1],"spawn":[1],"structures":[]}"#).is_err());
    }

    #[test]
    fn parses_sprites_in_both_formats() {
        let level: Level = "DI: 8, 8\nSO: 3, 4, 2.5, 0.5; 90\nSO: 4, 1, 1, 0.25".parse().unwrap();
        assert_eq!(
            level.sprites,
            vec![
                SpriteSpec {
                    id: 3,
                    position: [4.0, 2.5],
                    width: 0.5,
                    angle: 90.0,
                },
                SpriteSpec {
                    id: 4,
                    position: [1.0, 1.0],
                    width: 0.25,
                    angle: 0.0,
                },
            ]
        );

        let err = "DI: 8, 8\nSO: 1.5, 4, 2, 1".parse::<Level>().unwrap_err();
        assert!(err.starts_with("Error in line 2!"), "{err}");

        let level = Level::from_json(
            r#"{
                "dimensions": [8, 8],
                "spawn": [1, 1],
                "structures": [],
                "sprites": [{ "id": 9, "position": [2, 3], "width": 1 }]
            }"#,
        )
        .unwrap();
        assert_eq!(level.sprites[0].id, 9);
        assert_eq!(level.sprites[0].angle, 0.0);
    }

    #[test]
    fn clamps_structures_per_axis() {
        let mut level: Level = "DI: 10, 5\nWA: -3, 2, 14, 9".parse().unwrap();
        level.clamp_structures();
        assert_eq!(level.structures[0].coords(), [0.0, 2.0, 10.0, 5.0]);
    }
}
