//! Leave Engine
//!
//! This crate computes employee leave entitlement from monthly accrual
//! rules, reconciles it against approved leave (cascading overflow into
//! annual leave and then into leave without pay), and distributes leave
//! into a month-by-month paid/unpaid ledger for payroll.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
