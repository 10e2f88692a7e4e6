//! Terminal output. Results go to stdout, toasts and errors to stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::fmt::Display;

use serenity_admin::components::DataTable;
use serenity_storefront::{ToastLevel, ToastReceiver};

pub fn line(text: impl Display) {
    println!("{text}");
}

pub fn blank() {
    println!();
}

pub fn table(table: &DataTable) {
    println!("{}", table.render());
}

/// A label/value pair, label padded to a fixed width.
pub fn field(label: &str, value: impl Display) {
    println!("{label:<10} {value}");
}

pub fn error(err: &dyn std::error::Error) {
    eprintln!("error: {err}");
}

/// Print every toast raised so far.
pub fn drain_toasts(toasts: &mut ToastReceiver) {
    while let Ok(toast) = toasts.try_recv() {
        let tag = match toast.level {
            ToastLevel::Success => "ok",
            ToastLevel::Info => "info",
            ToastLevel::Error => "failed",
        };
        eprintln!("[{tag}] {toast}");
    }
}
