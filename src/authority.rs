//! Administrative role that can change hands but is never left empty.

use crate::error::AuthorityError;
use crate::types::Address;
use crate::types::Authority;
use crate::types::Origin;

/// Capability holder for configuration changes.
///
/// There is no way to construct or leave an `AdminRole` without a holder:
/// transfers require a non-null successor and renouncing always fails.
#[derive(Debug, Clone)]
pub struct AdminRole {
    holder: Authority,
    /// Bridge contract trusted to relay calls from a cross-domain holder.
    messenger: Address,
}

impl AdminRole {
    pub fn new(holder: Authority, messenger: Address) -> Result<Self, AuthorityError> {
        if holder.address().is_zero() {
            return Err(AuthorityError::ZeroAddress);
        }
        Ok(Self { holder, messenger })
    }

    pub fn holder(&self) -> Authority {
        self.holder
    }

    pub fn messenger(&self) -> Address {
        self.messenger
    }

    /// Whether a call from `origin` is made by the current holder.
    ///
    /// A local holder must call directly. A cross-domain holder's call must
    /// be relayed by the trusted messenger with the holder as sender.
    pub fn is_authorized(&self, origin: &Origin) -> bool {
        match (self.holder, origin) {
            (Authority::Local(holder), Origin::Direct(caller)) => holder == *caller,
            (Authority::CrossDomain(holder), Origin::Bridge { messenger, sender }) => {
                *messenger == self.messenger && holder == *sender
            }
            _ => false,
        }
    }

    pub fn ensure(&self, origin: &Origin) -> Result<(), AuthorityError> {
        if self.is_authorized(origin) {
            Ok(())
        } else {
            Err(AuthorityError::Unauthorized)
        }
    }

    /// Hand the role to `successor`, returning the previous holder.
    pub fn transfer(&mut self, successor: Authority) -> Result<Authority, AuthorityError> {
        if successor.address().is_zero() {
            return Err(AuthorityError::ZeroAddress);
        }
        Ok(std::mem::replace(&mut self.holder, successor))
    }

    pub fn renounce(&self) -> Result<(), AuthorityError> {
        Err(AuthorityError::CannotRenounceAuthority)
    }
}
