//! Address decoding for a set-associative cache.
//!
//! A 64-bit address is split into three fields, from most to least significant:
//!
//! ```text
//!  63                  s+b  s+b-1        b  b-1        0
//! +-----------------------+---------------+-------------+
//! |          tag          |   set index   | block offset|
//! +-----------------------+---------------+-------------+
//! ```
//!
//! The geometry is validated so that `s + b <= 63`, which keeps every shift
//! and mask below the full register width.

/// Largest value of `s + b` accepted by the decoder.
pub const MAX_ADDRESS_BITS: u32 = 63;

/// The fields of a decoded address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DecodedAddress {
    /// High-order bits identifying the memory block held by a line.
    pub tag: u64,
    /// Middle bits selecting the cache set.
    pub set_index: u64,
    /// Low-order bits giving the byte offset within the block.
    pub offset: u64,
}

/// Precomputed shifts and masks for one cache geometry.
///
/// Build once per configuration and reuse for every access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressDecoder {
    set_index_bits: u32,
    block_bits: u32,
    set_mask: u64,
    block_mask: u64,
    tag_mask: u64,
}

impl AddressDecoder {
    /// Creates a decoder for `2^set_index_bits` sets of `2^block_bits`-byte blocks.
    ///
    /// The caller guarantees `set_index_bits + block_bits <= 63`; the cache
    /// configuration enforces this before a decoder is ever built.
    pub fn new(set_index_bits: u32, block_bits: u32) -> Self {
        debug_assert!(set_index_bits + block_bits <= MAX_ADDRESS_BITS);

        let tag_shift = set_index_bits + block_bits;
        Self {
            set_index_bits,
            block_bits,
            set_mask: (1u64 << set_index_bits) - 1,
            block_mask: (1u64 << block_bits) - 1,
            // tag_shift == 0 leaves the whole address as the tag.
            tag_mask: u64::MAX >> tag_shift,
        }
    }

    /// Number of set-index bits (`s`).
    #[inline]
    pub fn set_index_bits(&self) -> u32 {
        self.set_index_bits
    }

    /// Number of block-offset bits (`b`).
    #[inline]
    pub fn block_bits(&self) -> u32 {
        self.block_bits
    }

    /// Mask applied to the shifted tag; all ones over the `64 - s - b` tag bits.
    #[inline]
    pub fn tag_mask(&self) -> u64 {
        self.tag_mask
    }

    /// Mask applied to the shifted set index; zero when `s == 0`.
    #[inline]
    pub fn set_mask(&self) -> u64 {
        self.set_mask
    }

    /// Splits `address` into its tag, set index and block offset.
    #[inline]
    pub fn decode(&self, address: u64) -> DecodedAddress {
        DecodedAddress {
            tag: (address >> (self.set_index_bits + self.block_bits)) & self.tag_mask,
            set_index: (address >> self.block_bits) & self.set_mask,
            offset: address & self.block_mask,
        }
    }

    /// Reassembles an address from its decoded fields.
    ///
    /// `recompose(decode(a)) == a` for every address.
    #[inline]
    pub fn recompose(&self, decoded: DecodedAddress) -> u64 {
        (decoded.tag << (self.set_index_bits + self.block_bits))
            | (decoded.set_index << self.block_bits)
            | decoded.offset
    }
}

/// Decodes `address` into `(tag, set_index)` for `s` set-index bits and `b` block bits.
///
/// Requires `s + b <= 63`.
pub fn decode(address: u64, s: u32, b: u32) -> (u64, u64) {
    let decoded = AddressDecoder::new(s, b).decode(address);
    (decoded.tag, decoded.set_index)
}
