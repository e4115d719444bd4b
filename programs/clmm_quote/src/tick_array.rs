//! Tick arrays and tick array sequences.
//!
//! Ticks are stored in fixed-size arrays of `TICK_ARRAY_SIZE` entries, each
//! array covering `TICK_ARRAY_SIZE * tick_spacing` consecutive tick indices
//! starting at a multiple of that span. A swap reads the arrays it walks
//! through as a [`TickArraySequence`]; the engine never fetches arrays itself,
//! so a scan that leaves the supplied arrays is a caller error.
use crate::constants::*;
use crate::errors::ErrorCode;
use crate::tick::Tick;
use anchor_lang::prelude::*;
use bytemuck::{Pod, Zeroable};

/// Number of tick indices covered by one tick array
#[inline(always)]
pub fn ticks_per_array(tick_spacing: u16) -> i32 {
    TICK_ARRAY_SIZE_I32 * i32::from(tick_spacing)
}

/// Start index of the tick array covering `tick_index`
///
/// `floor(tick_index / (TICK_ARRAY_SIZE * tick_spacing)) * TICK_ARRAY_SIZE * tick_spacing`,
/// with floor division so negative ticks map to the array below zero.
/// Ticks outside `MIN_TICK..=MAX_TICK` are rejected with `TickOutOfRange`.
pub fn tick_array_start_index(tick_index: i32, tick_spacing: u16) -> Result<i32> {
    require!(tick_spacing > 0, ErrorCode::InvalidTickSpacing);
    require!(
        (MIN_TICK..=MAX_TICK).contains(&tick_index),
        ErrorCode::TickOutOfRange
    );
    let span = ticks_per_array(tick_spacing);
    Ok(tick_index.div_euclid(span) * span)
}

/// Start indexes of the three tick arrays a swap from `tick_current_index` can touch
///
/// The first entry covers the current tick; the next two follow in the trade
/// direction. Arrays entirely past the global tick bound are omitted.
pub fn swap_tick_array_start_indexes(
    tick_current_index: i32,
    tick_spacing: u16,
    a_to_b: bool,
) -> Result<Vec<i32>> {
    let span = ticks_per_array(tick_spacing);
    let first = tick_array_start_index(tick_current_index, tick_spacing)?;
    let min_start = tick_array_start_index(MIN_TICK, tick_spacing)?;
    let max_start = tick_array_start_index(MAX_TICK, tick_spacing)?;

    Ok((0..3)
        .map(|offset| {
            if a_to_b {
                first - offset * span
            } else {
                first + offset * span
            }
        })
        .filter(|start| (min_start..=max_start).contains(start))
        .collect())
}

/// A fixed-size array of ticks, laid out as stored on-chain
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct TickArray {
    pub start_tick_index: i32,
    pub _padding: [u8; 12],
    pub ticks: [Tick; TICK_ARRAY_SIZE],
}

impl Default for TickArray {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl TickArray {
    /// 4 (start_tick_index) + 12 (padding) + 88 * 112 (ticks) = 9872 bytes.
    pub const LEN: usize = 16 + TICK_ARRAY_SIZE * Tick::LEN;

    /// Creates an empty tick array starting at `start_tick_index`.
    pub fn new(start_tick_index: i32, tick_spacing: u16) -> Result<Self> {
        require!(tick_spacing > 0, ErrorCode::InvalidTickSpacing);
        require!(
            start_tick_index.rem_euclid(ticks_per_array(tick_spacing)) == 0,
            ErrorCode::InvalidTickArrayStart
        );
        Ok(Self {
            start_tick_index,
            ..Self::default()
        })
    }

    /// Decodes a tick array from raw account bytes.
    ///
    /// The bytes need not be aligned. Anything other than exactly `LEN` bytes
    /// is rejected.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        bytemuck::try_pod_read_unaligned::<TickArray>(data)
            .map_err(|_| error!(ErrorCode::InvalidTickArrayData))
    }

    /// Whether this array covers `tick_index`, aligned or not.
    pub fn covers(&self, tick_index: i32, tick_spacing: u16) -> bool {
        // Decoded arrays can start anywhere, so the end may not fit in an i32
        let start = i64::from(self.start_tick_index);
        let end = start + i64::from(ticks_per_array(tick_spacing));
        (start..end).contains(&i64::from(tick_index))
    }

    /// Slot of `tick_index` in this array, if covered and aligned to the spacing.
    pub fn tick_offset(&self, tick_index: i32, tick_spacing: u16) -> Option<usize> {
        if tick_spacing == 0
            || tick_index.rem_euclid(i32::from(tick_spacing)) != 0
            || !self.covers(tick_index, tick_spacing)
        {
            return None;
        }
        usize::try_from((tick_index - self.start_tick_index) / i32::from(tick_spacing)).ok()
    }

    /// Returns the tick at `tick_index`.
    ///
    /// `None` if this array does not cover the index, the index is not a usable
    /// tick, or the tick is uninitialized.
    pub fn get_tick(&self, tick_index: i32, tick_spacing: u16) -> Option<Tick> {
        self.tick_offset(tick_index, tick_spacing)
            .map(|offset| self.ticks[offset])
            .filter(Tick::is_initialized)
    }

    /// Mutable access to the tick slot at `tick_index`, initialized or not.
    pub fn get_tick_mut(&mut self, tick_index: i32, tick_spacing: u16) -> Result<&mut Tick> {
        require!(tick_spacing > 0, ErrorCode::InvalidTickSpacing);
        require!(
            tick_index.rem_euclid(i32::from(tick_spacing)) == 0,
            ErrorCode::InvalidTickIndex
        );
        let offset = self
            .tick_offset(tick_index, tick_spacing)
            .ok_or_else(|| error!(ErrorCode::MissingTickArray))?;
        Ok(&mut self.ticks[offset])
    }
}

/// Finds the tick slot at `tick_index` among `tick_arrays`.
pub fn find_tick_mut(
    tick_arrays: &mut [TickArray],
    tick_index: i32,
    tick_spacing: u16,
) -> Result<&mut Tick> {
    let array = tick_arrays
        .iter_mut()
        .find(|array| array.covers(tick_index, tick_spacing))
        .ok_or_else(|| error!(ErrorCode::MissingTickArray))?;
    array.get_tick_mut(tick_index, tick_spacing)
}

/// Finds the tick at `tick_index` among `tick_arrays`, initialized or not.
pub fn find_tick(tick_arrays: &[TickArray], tick_index: i32, tick_spacing: u16) -> Result<Tick> {
    let array = tick_arrays
        .iter()
        .find(|array| array.covers(tick_index, tick_spacing))
        .ok_or_else(|| error!(ErrorCode::MissingTickArray))?;
    let offset = array
        .tick_offset(tick_index, tick_spacing)
        .ok_or_else(|| error!(ErrorCode::InvalidTickIndex))?;
    Ok(array.ticks[offset])
}

/// A contiguous, ordered run of tick arrays that a swap can walk through.
#[derive(Debug)]
pub struct TickArraySequence<'a> {
    tick_arrays: Vec<&'a TickArray>,
    tick_spacing: u16,
}

impl<'a> TickArraySequence<'a> {
    /// Orders the supplied arrays and checks that they form one contiguous run.
    ///
    /// Duplicate start indexes are collapsed. The arrays must be non-empty,
    /// aligned to `TICK_ARRAY_SIZE * tick_spacing` and leave no gaps.
    pub fn new(tick_arrays: &'a [TickArray], tick_spacing: u16) -> Result<Self> {
        require!(tick_spacing > 0, ErrorCode::InvalidTickSpacing);
        require!(!tick_arrays.is_empty(), ErrorCode::TickArraySequenceInvalid);

        let span = ticks_per_array(tick_spacing);
        let usable_starts =
            tick_array_start_index(MIN_TICK, tick_spacing)?..=tick_array_start_index(MAX_TICK, tick_spacing)?;
        let mut ordered: Vec<&TickArray> = tick_arrays.iter().collect();
        ordered.sort_by_key(|array| array.start_tick_index);
        ordered.dedup_by_key(|array| array.start_tick_index);

        for array in &ordered {
            require!(
                array.start_tick_index.rem_euclid(span) == 0
                    && usable_starts.contains(&array.start_tick_index),
                ErrorCode::TickArraySequenceInvalid
            );
        }
        for pair in ordered.windows(2) {
            require!(
                pair[1].start_tick_index - pair[0].start_tick_index == span,
                ErrorCode::TickArraySequenceInvalid
            );
        }

        Ok(Self {
            tick_arrays: ordered,
            tick_spacing,
        })
    }

    pub fn tick_spacing(&self) -> u16 {
        self.tick_spacing
    }

    /// First tick index covered by the sequence.
    pub fn start_index(&self) -> i32 {
        self.tick_arrays
            .first()
            .map_or(0, |array| array.start_tick_index)
    }

    /// Last tick index covered by the sequence (inclusive).
    pub fn end_index(&self) -> i32 {
        self.tick_arrays.last().map_or(0, |array| {
            array.start_tick_index + ticks_per_array(self.tick_spacing) - 1
        })
    }

    fn covers(&self, tick_index: i32) -> bool {
        (self.start_index()..=self.end_index()).contains(&tick_index)
    }

    /// Returns the initialized tick at `tick_index`, or `MissingTickArray` if uncovered.
    pub fn get_tick(&self, tick_index: i32) -> Result<Option<Tick>> {
        let array = self
            .tick_arrays
            .iter()
            .find(|array| array.covers(tick_index, self.tick_spacing))
            .ok_or_else(|| error!(ErrorCode::MissingTickArray))?;
        Ok(array.get_tick(tick_index, self.tick_spacing))
    }

    /// Next boundary a swap from `tick_index` must stop at.
    ///
    /// Moving down (`a_to_b`) the scan starts at the usable tick at or below
    /// `tick_index`; moving up it starts strictly above. Returns the first
    /// initialized tick found, or `(None, edge)` when the scan reaches the
    /// edge of the sequence or the global tick bound, whichever comes first.
    pub fn next_swap_boundary(&self, tick_index: i32, a_to_b: bool) -> Result<(Option<Tick>, i32)> {
        let spacing = i32::from(self.tick_spacing);
        let aligned = tick_index.div_euclid(spacing) * spacing;

        if a_to_b {
            require!(self.covers(aligned), ErrorCode::MissingTickArray);
            let lower_bound = self.start_index().max(MIN_TICK);
            let mut candidate = aligned;
            while candidate >= lower_bound {
                if let Some(tick) = self.get_tick(candidate)? {
                    return Ok((Some(tick), candidate));
                }
                candidate -= spacing;
            }
            Ok((None, lower_bound))
        } else {
            let first = aligned + spacing;
            require!(self.covers(first), ErrorCode::MissingTickArray);
            let upper_bound = self.end_index().min(MAX_TICK);
            let mut candidate = first;
            while candidate <= upper_bound {
                if let Some(tick) = self.get_tick(candidate)? {
                    return Ok((Some(tick), candidate));
                }
                candidate += spacing;
            }
            Ok((None, upper_bound))
        }
    }

    /// Index of the next initialized tick from `tick_index` in the trade direction.
    ///
    /// `None` means the scan reached the global tick bound without finding one.
    /// Running off the supplied arrays first is `MissingTickArray`.
    pub fn next_initialized_tick(&self, tick_index: i32, a_to_b: bool) -> Result<Option<i32>> {
        let (tick, boundary) = self.next_swap_boundary(tick_index, a_to_b)?;
        if tick.is_some() {
            return Ok(Some(boundary));
        }
        let reached_global_bound = if a_to_b {
            boundary == MIN_TICK
        } else {
            boundary == MAX_TICK
        };
        if reached_global_bound {
            Ok(None)
        } else {
            err!(ErrorCode::MissingTickArray)
        }
    }
}
