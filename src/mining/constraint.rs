use alloy_primitives::{Address, U160};
use serde::{Deserialize, Serialize};
use std::ops::BitOr;

/// Hook permissions live in the lowest 14 bits of a hook's address.
pub const FLAG_BITS: u32 = 14;
pub const FLAG_MASK: u16 = (1 << FLAG_BITS) - 1;

/// Lifecycle callbacks a hook implements, encoded in its address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HookFlags(u16);

impl HookFlags {
    pub const NONE: HookFlags = HookFlags(0);
    pub const BEFORE_INITIALIZE: HookFlags = HookFlags(1 << 13);
    pub const AFTER_INITIALIZE: HookFlags = HookFlags(1 << 12);
    pub const BEFORE_ADD_LIQUIDITY: HookFlags = HookFlags(1 << 11);
    pub const AFTER_ADD_LIQUIDITY: HookFlags = HookFlags(1 << 10);
    pub const BEFORE_REMOVE_LIQUIDITY: HookFlags = HookFlags(1 << 9);
    pub const AFTER_REMOVE_LIQUIDITY: HookFlags = HookFlags(1 << 8);
    pub const BEFORE_SWAP: HookFlags = HookFlags(1 << 7);
    pub const AFTER_SWAP: HookFlags = HookFlags(1 << 6);
    pub const BEFORE_DONATE: HookFlags = HookFlags(1 << 5);
    pub const AFTER_DONATE: HookFlags = HookFlags(1 << 4);
    pub const BEFORE_SWAP_RETURNS_DELTA: HookFlags = HookFlags(1 << 3);
    pub const AFTER_SWAP_RETURNS_DELTA: HookFlags = HookFlags(1 << 2);
    pub const AFTER_ADD_LIQUIDITY_RETURNS_DELTA: HookFlags = HookFlags(1 << 1);
    pub const AFTER_REMOVE_LIQUIDITY_RETURNS_DELTA: HookFlags = HookFlags(1);

    /// Keeps only the bits that fit in the flag mask.
    pub const fn from_bits_truncate(bits: u16) -> Self {
        HookFlags(bits & FLAG_MASK)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, other: HookFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Reads the flags an address encodes.
    pub fn of_address(address: &Address) -> Self {
        let bytes = address.as_slice();
        HookFlags::from_bits_truncate(u16::from_be_bytes([bytes[18], bytes[19]]))
    }
}

impl BitOr for HookFlags {
    type Output = HookFlags;

    fn bitor(self, rhs: HookFlags) -> HookFlags {
        HookFlags(self.0 | rhs.0)
    }
}

/// A property a mined address must have.
pub trait AddressConstraint {
    fn is_satisfied(&self, address: &Address) -> bool;

    /// Inverse of the chance that a uniformly random address passes, used to
    /// scale the iteration ceiling.
    fn expected_attempts(&self) -> u64;
}

impl<C: AddressConstraint + ?Sized> AddressConstraint for &C {
    fn is_satisfied(&self, address: &Address) -> bool {
        (**self).is_satisfied(address)
    }

    fn expected_attempts(&self) -> u64 {
        (**self).expected_attempts()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    Below,
    Above,
}

/// Requires the address to sort strictly below or above `reference`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderingConstraint {
    pub reference: Address,
    pub position: Position,
}

impl OrderingConstraint {
    pub fn below(reference: Address) -> Self {
        Self {
            reference,
            position: Position::Below,
        }
    }

    pub fn above(reference: Address) -> Self {
        Self {
            reference,
            position: Position::Above,
        }
    }

    /// Ordering that makes a token land as token0 (below the numeraire) or
    /// token1 (above it).
    pub fn for_token(numeraire: Address, token0: bool) -> Self {
        if token0 {
            Self::below(numeraire)
        } else {
            Self::above(numeraire)
        }
    }
}

impl AddressConstraint for OrderingConstraint {
    fn is_satisfied(&self, address: &Address) -> bool {
        let candidate: U160 = (*address).into();
        let reference: U160 = self.reference.into();
        match self.position {
            Position::Below => candidate < reference,
            Position::Above => candidate > reference,
        }
    }

    // one bit of constraint
    fn expected_attempts(&self) -> u64 {
        2
    }
}

/// Requires the low 14 bits of the address to equal `flags` exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookFlagsConstraint {
    pub flags: HookFlags,
}

impl HookFlagsConstraint {
    pub fn new(flags: HookFlags) -> Self {
        Self { flags }
    }
}

impl AddressConstraint for HookFlagsConstraint {
    fn is_satisfied(&self, address: &Address) -> bool {
        HookFlags::of_address(address) == self.flags
    }

    fn expected_attempts(&self) -> u64 {
        1 << FLAG_BITS
    }
}

/// Both constraints must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllOf<A, B>(pub A, pub B);

impl<A: AddressConstraint, B: AddressConstraint> AddressConstraint for AllOf<A, B> {
    fn is_satisfied(&self, address: &Address) -> bool {
        self.0.is_satisfied(address) && self.1.is_satisfied(address)
    }

    fn expected_attempts(&self) -> u64 {
        self.0
            .expected_attempts()
            .saturating_mul(self.1.expected_attempts())
    }
}

/// Hook constraint used when the hook must also sort on a given side of
/// another address.
pub fn hook_constraint(
    flags: HookFlags,
    ordering: OrderingConstraint,
) -> AllOf<HookFlagsConstraint, OrderingConstraint> {
    AllOf(HookFlagsConstraint::new(flags), ordering)
}
