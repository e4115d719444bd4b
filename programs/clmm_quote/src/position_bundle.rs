//! Position bundles: many positions sharing one account, addressed by bundle index.
use crate::constants::*;
use crate::errors::ErrorCode;
use anchor_lang::prelude::*;

/// Occupancy of the `POSITION_BUNDLE_SIZE` slots of a bundle, one bit per slot.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PositionBundle {
    pub position_bitmap: [u8; POSITION_BUNDLE_BITMAP_BYTES],
}

impl PositionBundle {
    fn slot(bundle_index: u16) -> Result<(usize, u8)> {
        require!(
            bundle_index < POSITION_BUNDLE_SIZE,
            ErrorCode::InvalidBundleIndex
        );
        let index = usize::from(bundle_index);
        Ok((index / 8, 1u8 << (index % 8)))
    }

    pub fn is_bundle_index_in_use(&self, bundle_index: u16) -> Result<bool> {
        let (byte, mask) = Self::slot(bundle_index)?;
        Ok(self.position_bitmap[byte] & mask != 0)
    }

    /// Marks a slot occupied; `BundledPositionAlreadyOpened` if it already is.
    pub fn open_bundled_position(&mut self, bundle_index: u16) -> Result<()> {
        let (byte, mask) = Self::slot(bundle_index)?;
        require!(
            self.position_bitmap[byte] & mask == 0,
            ErrorCode::BundledPositionAlreadyOpened
        );
        self.position_bitmap[byte] |= mask;
        msg!("Opened bundled position {}", bundle_index);
        Ok(())
    }

    /// Marks a slot free; `BundledPositionAlreadyClosed` if it already is.
    pub fn close_bundled_position(&mut self, bundle_index: u16) -> Result<()> {
        let (byte, mask) = Self::slot(bundle_index)?;
        require!(
            self.position_bitmap[byte] & mask != 0,
            ErrorCode::BundledPositionAlreadyClosed
        );
        self.position_bitmap[byte] &= !mask;
        msg!("Closed bundled position {}", bundle_index);
        Ok(())
    }

    /// Lowest free slot, if any.
    pub fn first_unoccupied_index(&self) -> Option<u16> {
        (0..POSITION_BUNDLE_SIZE).find(|&index| !self.is_occupied(index))
    }

    /// Every occupied slot, ascending.
    pub fn occupied_indexes(&self) -> Vec<u16> {
        (0..POSITION_BUNDLE_SIZE)
            .filter(|&index| self.is_occupied(index))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.position_bitmap.iter().all(|byte| *byte == 0)
    }

    fn is_occupied(&self, bundle_index: u16) -> bool {
        let index = usize::from(bundle_index);
        self.position_bitmap[index / 8] & (1u8 << (index % 8)) != 0
    }
}
