//! Three-block geometry parser: bodies, zones, media.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use gemca_body::{Body, BodyError, BodyId, BodyKind, BodyType};
use gemca_csg::{compile, CsgError};
use gemca_zone::{Workspace, Zone, ZoneId};
use log::{debug, warn};

use crate::lexer::{number, Card};
use crate::{GeoError, VoxelHeaderSource};

/// First characters of a zone continuation line.
const ZONE_CONTINUATION: [char; 5] = ['+', '-', '|', '(', ')'];

/// Body and zone counts found by [`prescan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Counts {
    pub bodies: usize,
    pub zones: usize,
}

/// Count body definitions in the first block and zone definitions in the
/// second, without validating anything.
pub(crate) fn prescan(cards: &[Card<'_>]) -> Counts {
    let mut counts = Counts { bodies: 0, zones: 0 };
    let mut block = 0;
    for card in cards {
        if card.is("END") {
            block += 1;
            if block == 2 {
                break;
            }
            continue;
        }
        if block == 0 {
            if BodyType::from_keyword(card.key).is_some() {
                counts.bodies += 1;
            }
        } else if !card.key.starts_with(ZONE_CONTINUATION) {
            counts.zones += 1;
        }
    }
    counts
}

/// A body whose parameter lines are still being read.
struct PendingBody<'a> {
    line: usize,
    ty: BodyType,
    name: &'a str,
    params: Vec<f64>,
    header: Option<(usize, &'a str)>,
}

/// A zone as written, before compilation.
struct ZoneSource<'a> {
    line: usize,
    name: &'a str,
    expression: String,
}

/// A media directive: assign `medium` to zones `first..=last` by `stride`.
struct Assignment {
    medium: u32,
    first: usize,
    last: usize,
    stride: usize,
}

pub(crate) struct Parser<'a> {
    cards: &'a [Card<'a>],
    pos: usize,
    voxels: &'a dyn VoxelHeaderSource,
    base_dir: Option<&'a Path>,
}

impl<'a> Parser<'a> {
    pub fn new(
        cards: &'a [Card<'a>],
        voxels: &'a dyn VoxelHeaderSource,
        base_dir: Option<&'a Path>,
    ) -> Self {
        Self {
            cards,
            pos: 0,
            voxels,
            base_dir,
        }
    }

    fn next_card(&mut self) -> Option<&'a Card<'a>> {
        let card = self.cards.get(self.pos)?;
        self.pos += 1;
        Some(card)
    }

    /// Parse all three blocks into a workspace.
    pub fn parse(mut self) -> Result<Workspace, GeoError> {
        let counts = prescan(self.cards);

        let bodies = self.parse_bodies(counts.bodies)?;
        if bodies.is_empty() {
            return Err(GeoError::Empty("bodies"));
        }
        check_count("body", counts.bodies, bodies.len())?;

        let sources = self.parse_zones(counts.zones)?;
        if sources.is_empty() {
            return Err(GeoError::Empty("zones"));
        }
        check_count("zone", counts.zones, sources.len())?;

        let media = self.parse_media(&sources)?;

        let index: HashMap<&str, BodyId> = bodies
            .iter()
            .enumerate()
            .map(|(i, b)| (b.name.as_str(), BodyId(i)))
            .collect();
        let mut zones = Vec::with_capacity(sources.len());
        for (i, (source, medium)) in sources.into_iter().zip(media).enumerate() {
            let tree = compile(&source.expression, |name| index.get(name).copied()).map_err(
                |err| {
                    let token = match &err {
                        CsgError::UnknownBody(name) => name.clone(),
                        _ => source.expression.clone(),
                    };
                    GeoError::Zone {
                        line: source.line,
                        zone: source.name.to_string(),
                        token,
                        source: err,
                    }
                },
            )?;
            let mut zone = Zone::new(ZoneId(i + 1), source.name, source.expression, tree);
            zone.medium = medium;
            zone.line = source.line;
            debug!("zone {} '{}' medium {}", zone.id, zone.name, zone.medium);
            zones.push(zone);
        }

        Ok(Workspace::new(bodies, zones)?)
    }

    fn parse_bodies(&mut self, capacity: usize) -> Result<Vec<Body>, GeoError> {
        let mut bodies = Vec::with_capacity(capacity);
        let mut first_line: HashMap<&str, usize> = HashMap::with_capacity(capacity);
        let mut pending: Option<PendingBody<'a>> = None;

        while let Some(card) = self.next_card() {
            if card.is("END") {
                if let Some(body) = pending.take() {
                    bodies.push(self.finish_body(body)?);
                }
                return Ok(bodies);
            }

            if let Some(ty) = BodyType::from_keyword(card.key) {
                if let Some(body) = pending.take() {
                    bodies.push(self.finish_body(body)?);
                }
                let Some((&name, fields)) = card.args.split_first() else {
                    return Err(GeoError::syntax(card.line, card.key, "body name missing"));
                };
                if name.contains(ZONE_CONTINUATION) {
                    return Err(GeoError::syntax(
                        card.line,
                        name,
                        "body names may not contain + - | ( )",
                    ));
                }
                if let Some(&first) = first_line.get(name) {
                    return Err(GeoError::DuplicateBody {
                        line: card.line,
                        name: name.to_string(),
                        first,
                    });
                }
                first_line.insert(name, card.line);
                pending = Some(PendingBody {
                    line: card.line,
                    ty,
                    name,
                    params: numbers(card.line, fields.iter().copied())?,
                    header: None,
                });
            } else if number(card.key).is_some() {
                let body = pending.as_mut().ok_or_else(|| {
                    GeoError::syntax(card.line, card.key, "parameters before the first body")
                })?;
                body.params.extend(numbers(card.line, card.words())?);
            } else if let Some(body) = pending
                .as_mut()
                .filter(|b| b.ty == BodyType::Vox && b.header.is_none())
            {
                body.header = Some((card.line, card.text));
            } else {
                return Err(GeoError::UnknownKeyword {
                    line: card.line,
                    keyword: card.key.to_string(),
                });
            }
        }
        Err(GeoError::MissingEnd("body"))
    }

    fn finish_body(&self, pending: PendingBody<'_>) -> Result<Body, GeoError> {
        let PendingBody {
            line,
            ty,
            name,
            params,
            header,
        } = pending;
        let rejected = |source: BodyError| GeoError::Body {
            line,
            name: name.to_string(),
            source,
        };

        let kind = if ty == BodyType::Vox {
            let (header_line, header) =
                header.ok_or_else(|| rejected(BodyError::MissingVoxelHeader))?;
            let path = self.header_path(header);
            let extent = self
                .voxels
                .extent(&path)
                .map_err(|source| GeoError::VoxelHeader {
                    line: header_line,
                    path,
                    source,
                })?;
            BodyKind::voxels(&params, extent).map_err(rejected)?
        } else {
            BodyKind::from_params(ty, &params).map_err(rejected)?
        };

        let body = Body::new(name, kind).map_err(rejected)?.with_line(line);
        debug!(
            "body {} '{}' on line {}: {} surfaces",
            ty,
            body.name,
            line,
            body.surfaces().len()
        );
        Ok(body)
    }

    fn header_path(&self, header: &str) -> PathBuf {
        let path = Path::new(header);
        match self.base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    fn parse_zones(&mut self, capacity: usize) -> Result<Vec<ZoneSource<'a>>, GeoError> {
        let mut zones: Vec<ZoneSource<'a>> = Vec::with_capacity(capacity);

        while let Some(card) = self.next_card() {
            if card.is("END") {
                return Ok(zones);
            }
            if card.key.starts_with(ZONE_CONTINUATION) {
                let zone = zones.last_mut().ok_or_else(|| {
                    GeoError::syntax(card.line, card.text, "zone continuation before the first zone")
                })?;
                zone.expression.push(' ');
                zone.expression.push_str(card.text);
            } else if card.key == "OR" {
                return Err(GeoError::syntax(
                    card.line,
                    card.key,
                    "a zone line cannot start with OR, use '|'",
                ));
            } else {
                if zones.iter().any(|z| z.name == card.key) {
                    warn!("line {}: zone name '{}' is used twice", card.line, card.key);
                }
                zones.push(ZoneSource {
                    line: card.line,
                    name: card.key,
                    expression: card.rest(),
                });
            }
        }
        Err(GeoError::MissingEnd("zone"))
    }

    /// Read the media block and return one medium per zone.
    ///
    /// Positional values are either one medium per zone, or a zone list
    /// followed by one medium per zone. `ASSIGNMA(T)` directives are
    /// applied on top of the positional values.
    fn parse_media(&mut self, zones: &[ZoneSource<'_>]) -> Result<Vec<u32>, GeoError> {
        let n = zones.len();
        let mut positional: Vec<u32> = Vec::new();
        let mut assignments = Vec::new();
        let mut last_line = 0;

        while let Some(card) = self.next_card() {
            if card.is("ASSIGNMAT") || card.is("ASSIGNMA") {
                assignments.push(assignment(card, zones)?);
            } else if card.is("END") {
                break;
            } else {
                for word in card.words() {
                    positional.push(medium(card.line, word)?);
                }
                last_line = card.line;
            }
        }

        let mut media = vec![0; n];
        let mut assigned = vec![false; n];
        let listed = match positional.len() {
            0 => &positional[..],
            len if len == n => &positional[..],
            len if len == 2 * n => &positional[n..],
            len => {
                warn!("line {last_line}: media list holds {len} values for {n} zones");
                return Err(GeoError::CountMismatch {
                    what: "medium",
                    expected: n,
                    found: len,
                });
            }
        };
        for (i, &m) in listed.iter().enumerate() {
            media[i] = m;
            assigned[i] = true;
        }

        for a in &assignments {
            for zone in (a.first..=a.last).step_by(a.stride) {
                media[zone - 1] = a.medium;
                assigned[zone - 1] = true;
            }
        }

        for (zone, done) in zones.iter().zip(assigned) {
            if !done {
                warn!(
                    "zone '{}' (line {}) has no medium, using 0",
                    zone.name, zone.line
                );
            }
        }
        Ok(media)
    }
}

fn check_count(what: &'static str, expected: usize, found: usize) -> Result<(), GeoError> {
    if expected == found {
        Ok(())
    } else {
        Err(GeoError::CountMismatch {
            what,
            expected,
            found,
        })
    }
}

fn numbers<'w>(
    line: usize,
    words: impl Iterator<Item = &'w str>,
) -> Result<Vec<f64>, GeoError> {
    words
        .map(|w| number(w).ok_or_else(|| GeoError::syntax(line, w, "malformed number")))
        .collect()
}

fn medium(line: usize, word: &str) -> Result<u32, GeoError> {
    word.parse()
        .map_err(|_| GeoError::syntax(line, word, "medium must be a non-negative integer"))
}

/// Resolve a zone reference: a zone name first, then a 1-based number.
fn zone_ref(line: usize, word: &str, zones: &[ZoneSource<'_>]) -> Result<usize, GeoError> {
    if let Some(i) = zones.iter().position(|z| z.name == word) {
        return Ok(i + 1);
    }
    match word.parse::<usize>() {
        Ok(z) if (1..=zones.len()).contains(&z) => Ok(z),
        Ok(_) => Err(GeoError::syntax(line, word, "zone number out of range")),
        Err(_) => Err(GeoError::UnknownZone {
            line,
            name: word.to_string(),
        }),
    }
}

/// Parse `ASSIGNMAT medium zone [last_zone] [stride]`.
fn assignment(card: &Card<'_>, zones: &[ZoneSource<'_>]) -> Result<Assignment, GeoError> {
    let line = card.line;
    let (medium_word, first_word) = match card.args.as_slice() {
        [m, z, ..] => (*m, *z),
        _ => {
            return Err(GeoError::syntax(
                line,
                card.text,
                "ASSIGNMAT needs a medium and a zone",
            ))
        }
    };
    if card.args.len() > 4 {
        warn!("line {line}: ignoring extra ASSIGNMAT fields");
    }

    let first = zone_ref(line, first_word, zones)?;
    let last = match card.args.get(2) {
        Some(w) => zone_ref(line, w, zones)?,
        None => first,
    };
    if last < first {
        return Err(GeoError::syntax(line, card.text, "zone range ends before it starts"));
    }
    let stride = match card.args.get(3) {
        Some(w) => match w.parse::<usize>() {
            Ok(s) if s > 0 => s,
            _ => return Err(GeoError::syntax(line, *w, "stride must be a positive integer")),
        },
        None => 1,
    };

    Ok(Assignment {
        medium: medium(line, medium_word)?,
        first,
        last,
        stride,
    })
}
