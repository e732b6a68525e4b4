//! Line protocol.
//!
//! Input is whitespace-separated integers read once at startup and then
//! once per turn. Line breaks carry no meaning; only token order does.
//!
//! ## Startup
//!
//! ```text
//! numSites
//! siteId x y radius            (numSites times)
//! ```
//!
//! ## Each turn
//!
//! ```text
//! gold touchedSite             (-1 when not touching a site; other negatives are ignored)
//! siteId gold maxMineSize structureType owner param1 param2   (numSites times)
//! numUnits
//! x y owner unitType health    (numUnits times)
//! ```
//!
//! ## Output
//!
//! Exactly two lines per turn: the queen command then the training command.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use royale_core::engine::TurnOrders;
use royale_core::error::CoreError;
use royale_core::math::Position;
use royale_core::site::{Owner, RawStructure, SiteId, SiteInit, SiteSnapshot};
use royale_core::unit::{Unit, UnitType};
use royale_core::world::TurnSnapshot;
use thiserror::Error;

/// Errors reading or writing the protocol. All are fatal for the session.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Reading stdin or writing stdout failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Input ended in the middle of a block.
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof {
        /// Field being read.
        expected: &'static str,
    },

    /// A token that is not an integer.
    #[error("Invalid {field}: {token:?}")]
    InvalidToken {
        /// Field being read.
        field: &'static str,
        /// Raw token.
        token: String,
    },

    /// An integer the engine cannot interpret.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias using [`ProtocolError`].
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Whitespace tokenizer over a buffered reader.
#[derive(Debug)]
pub struct TokenReader<R> {
    input: R,
    pending: VecDeque<String>,
    line: String,
}

impl<R: BufRead> TokenReader<R> {
    /// Wrap `input`.
    pub fn new(input: R) -> Self {
        Self {
            input,
            pending: VecDeque::new(),
            line: String::new(),
        }
    }

    /// Next raw token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<String>> {
        while self.pending.is_empty() {
            self.line.clear();
            if self.input.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(self.line.split_whitespace().map(str::to_owned));
        }
        Ok(self.pending.pop_front())
    }

    /// Next integer, or `None` at end of input.
    pub fn next_int_or_eof(&mut self, field: &'static str) -> Result<Option<i32>> {
        match self.next_token()? {
            None => Ok(None),
            Some(token) => token
                .parse()
                .map(Some)
                .map_err(|_| ProtocolError::InvalidToken { field, token }),
        }
    }

    /// Next integer. End of input is an error.
    pub fn next_int(&mut self, field: &'static str) -> Result<i32> {
        self.next_int_or_eof(field)?
            .ok_or(ProtocolError::UnexpectedEof { expected: field })
    }

    fn next_count(&mut self, field: &'static str) -> Result<usize> {
        let value = self.next_int(field)?;
        usize::try_from(value).map_err(|_| ProtocolError::InvalidToken {
            field,
            token: value.to_string(),
        })
    }

    fn next_site_id(&mut self, field: &'static str) -> Result<SiteId> {
        let value = self.next_int(field)?;
        Ok(site_id(value)?)
    }
}

fn site_id(value: i32) -> std::result::Result<SiteId, CoreError> {
    SiteId::try_from(value).map_err(|_| CoreError::InvalidSiteId(value))
}

/// Read the startup site table.
pub fn read_startup<R: BufRead>(reader: &mut TokenReader<R>) -> Result<Vec<SiteInit>> {
    let count = reader.next_count("site count")?;
    let mut sites = Vec::with_capacity(count);
    for _ in 0..count {
        let id = reader.next_site_id("site id")?;
        let x = reader.next_int("site x")?;
        let y = reader.next_int("site y")?;
        let radius = reader.next_int("site radius")?;
        sites.push(SiteInit {
            id,
            position: Position::new(x, y),
            radius,
        });
    }
    tracing::debug!("Read {} sites", sites.len());
    Ok(sites)
}

/// Read one turn for a map of `site_count` sites.
///
/// Returns `Ok(None)` when input ends cleanly before the turn starts.
pub fn read_turn<R: BufRead>(
    reader: &mut TokenReader<R>,
    site_count: usize,
) -> Result<Option<TurnSnapshot>> {
    let Some(gold) = reader.next_int_or_eof("gold")? else {
        return Ok(None);
    };
    let touched = reader.next_int("touched site")?;
    let touched_site = match touched {
        -1 => None,
        value => match SiteId::try_from(value) {
            Ok(id) => Some(id),
            Err(_) => {
                tracing::warn!("Ignoring touched site {}", value);
                None
            }
        },
    };

    let mut sites = Vec::with_capacity(site_count);
    for _ in 0..site_count {
        let id = reader.next_site_id("site id")?;
        let gold_remaining = reader.next_int("gold remaining")?;
        let max_mine_size = reader.next_int("max mine size")?;
        let structure = RawStructure::try_from(reader.next_int("structure type")?)?;
        let owner = Owner::try_from(reader.next_int("owner")?)?;
        let param1 = reader.next_int("param1")?;
        let param2 = reader.next_int("param2")?;
        sites.push(SiteSnapshot {
            id,
            gold_remaining,
            max_mine_size,
            structure,
            owner,
            param1,
            param2,
        });
    }

    let unit_count = reader.next_count("unit count")?;
    let mut units = Vec::with_capacity(unit_count);
    for _ in 0..unit_count {
        let x = reader.next_int("unit x")?;
        let y = reader.next_int("unit y")?;
        let owner = Owner::try_from(reader.next_int("unit owner")?)?;
        let unit_type = UnitType::try_from(reader.next_int("unit type")?)?;
        let health = reader.next_int("unit health")?;
        units.push(Unit::new(Position::new(x, y), health, owner, unit_type));
    }

    Ok(Some(TurnSnapshot {
        gold,
        touched_site,
        sites,
        units,
    }))
}

/// Write the two command lines for a turn and flush.
pub fn write_orders<W: Write>(output: &mut W, orders: &TurnOrders) -> io::Result<()> {
    writeln!(output, "{}", orders.queen)?;
    writeln!(output, "{}", orders.train)?;
    output.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(text: &str) -> TokenReader<&[u8]> {
        TokenReader::new(text.as_bytes())
    }

    #[test]
    fn test_tokens_ignore_line_breaks() {
        let mut r = reader("1 2\n\n  3\n4");
        let mut seen = Vec::new();
        while let Some(v) = r.next_int_or_eof("n").unwrap() {
            seen.push(v);
        }
        assert_eq!(seen, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_startup() {
        let mut r = reader("2\n0 100 200 60\n1 300 400 70\n");
        let sites = read_startup(&mut r).unwrap();
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[1].position, Position::new(300, 400));
        assert_eq!(sites[1].radius, 70);
    }

    #[test]
    fn test_turn() {
        let mut r = reader("120 -1\n0 80 2 2 0 3 1\n2\n10 20 0 -1 90\n30 40 1 0 25\n");
        let turn = read_turn(&mut r, 1).unwrap().unwrap();
        assert_eq!(turn.gold, 120);
        assert_eq!(turn.touched_site, None);
        assert_eq!(turn.sites[0].structure, RawStructure::Barracks);
        assert_eq!(turn.sites[0].param2, 1);
        assert_eq!(turn.units[0].unit_type, UnitType::Queen);
        assert_eq!(turn.units[1].owner, Owner::Enemy);
        assert_eq!(turn.units[1].health, 25);
        assert!(read_turn(&mut r, 1).unwrap().is_none());
    }

    #[test]
    fn test_truncated_turn_is_error() {
        let mut r = reader("120 3\n0 80 2");
        let err = read_turn(&mut r, 1).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::UnexpectedEof {
                expected: "structure type"
            }
        ));
    }

    #[test]
    fn test_bad_token() {
        let mut r = reader("abc");
        let err = read_startup(&mut r).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::InvalidToken { field: "site count", .. }
        ));
    }

    #[test]
    fn test_bad_owner_code() {
        let mut r = reader("0 -1\n0 5 1 0 7 0 0\n0\n");
        let err = read_turn(&mut r, 1).unwrap_err();
        assert!(matches!(err, ProtocolError::Core(CoreError::InvalidOwner(7))));
    }

    #[test]
    fn test_negative_touched_site_reads_as_none() {
        let mut r = reader("40 -5\n0\n");
        let turn = read_turn(&mut r, 0).unwrap().unwrap();
        assert_eq!(turn.gold, 40);
        assert_eq!(turn.touched_site, None);
        assert!(turn.units.is_empty());
    }
}
