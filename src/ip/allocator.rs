//! Subnet allocation logic.
//!
//! Hands out subnets of a requested prefix length from a configurable base
//! block, skipping anything that overlaps a previous allocation. Candidates
//! are enumerated in canonical order (ascending network address), which makes
//! every allocation sequence fully deterministic.

use ipnet::Ipv4Net;
use std::net::Ipv4Addr;

use crate::error::{GenError, Result};

/// Allocator over one base block. The used list is an ordered record of every
/// subnet handed out or externally reserved.
#[derive(Debug)]
pub struct SubnetAllocator {
    base: Ipv4Net,
    used: Vec<Ipv4Net>,
}

impl SubnetAllocator {
    pub fn new(base: Ipv4Net) -> Self {
        SubnetAllocator {
            base,
            used: Vec::new(),
        }
    }

    /// Allocator over `<octet>.0.0.0/8`, the base shape every request uses.
    pub fn for_octet(octet: u8) -> Self {
        // Prefix 8 on a well-formed first octet cannot fail.
        let base = Ipv4Net::new(Ipv4Addr::new(octet, 0, 0, 0), 8)
            .unwrap_or_else(|_| unreachable!("/8 is always a valid prefix length"));
        SubnetAllocator::new(base)
    }

    pub fn base(&self) -> Ipv4Net {
        self.base
    }

    /// Hand out the first free subnet of the given prefix length.
    pub fn allocate(&mut self, prefix: u8) -> Result<Ipv4Net> {
        let base = self.base;
        let exhausted = move || GenError::AddressExhausted { prefix, base };

        if prefix < self.base.prefix_len() || prefix > 32 {
            return Err(exhausted());
        }

        let candidates = self.base.subnets(prefix).map_err(|_| exhausted())?;
        for candidate in candidates {
            if !self.conflicts(&candidate) {
                log::debug!("allocated {} from {}", candidate, self.base);
                self.used.push(candidate);
                return Ok(candidate);
            }
        }
        Err(exhausted())
    }

    /// Reserve a subnet allocated elsewhere so later requests avoid it.
    pub fn mark_used(&mut self, net: Ipv4Net) {
        self.used.push(net);
    }

    /// Two networks overlap iff one contains the other's network address.
    fn conflicts(&self, candidate: &Ipv4Net) -> bool {
        self.used.iter().any(|used| {
            used.contains(&candidate.network()) || candidate.contains(&used.network())
        })
    }
}
