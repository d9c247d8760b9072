//! `rxstock-suppliers` — supplier records and their status lifecycle.
//!
//! Suppliers are never physically deleted: historical purchase orders keep a
//! resolvable reference, so "delete" is always the soft `inactive` status
//! change modelled here.

pub mod supplier;

pub use supplier::{
    ContactInfo, DeactivateSupplier, ReactivateSupplier, Supplier, SupplierCommand,
    SupplierEvent, SupplierId, SupplierStatus, UpdateSupplier,
};
