//! Printed guidance for the physical steps the user performs

use std::io::{self, Write};
use std::path::Path;

use crate::models::Half;
use crate::utils::timestamp;

fn rule() {
    println!("{}", "━".repeat(60));
}

/// Boxed section title
pub fn print_banner(title: &str) {
    rule();
    println!("{}", title);
    rule();
}

/// What to do before the bootloader volume can appear
pub fn print_setup_instructions(label: &str, half: Half, token: &str, timeout_secs: u64) {
    println!();
    print_banner(&format!("⚠️  FLASHING: {}", label));
    println!();
    println!("📋 What to do:");
    println!("   1. Disconnect the TRRS cable between the halves!");
    println!("   2. Unplug USB from both halves");
    println!("   3. Check the power switch:");
    println!("      • Right half: ON = {}", Half::Right.power_on_direction());
    println!("      • Left half:  ON = {}", Half::Left.power_on_direction());
    println!("   4. Plug USB into the {} only", half);
    println!("   5. Double-press the RESET button on the controller");
    println!("      (the {} drive will appear)", token);
    println!();
    println!(
        "⏳ Waiting for the {} drive... (timeout {} s)",
        token, timeout_secs
    );
    println!("   (press Ctrl+C to cancel)");
    println!();
}

/// Single-line countdown, rewritten in place
pub fn print_countdown(remaining_secs: u64) {
    print!("\r⏳ Remaining: {:02} s...", remaining_secs);
    let _ = io::stdout().flush();
}

/// Short reminder shown after each successful half
pub fn print_method_b_hint() {
    println!("ℹ️  If the next half does not show up:");
    println!("   Try METHOD B:");
    println!("   1. Unplug USB");
    println!("   2. HOLD the RESET button");
    println!("   3. Plug USB in (keep holding RESET)");
    println!("   4. Release RESET after 2-3 seconds");
    println!();
}

/// Full alternate bootloader entry procedure shown on timeout
pub fn print_alternate_bootloader_procedure(token: &str) {
    println!();
    println!();
    println!("⏱️  Timeout! The {} drive was not detected.", token);
    println!();
    print_banner("💡 METHOD B: alternate bootloader entry");
    println!();
    println!("Use this if the double reset does not work:");
    println!();
    println!("   1. Unplug USB from the keyboard");
    println!("   2. Find the RESET button on the controller");
    println!("   3. PRESS and HOLD the RESET button");
    println!("   4. Plug USB in (keep HOLDING RESET!)");
    println!("   5. Keep holding RESET for 2-3 seconds after plugging in");
    println!("   6. Release RESET");
    println!("   7. The {} drive should appear", token);
    println!();
    println!("Alternative: short the RST and GND pads twice with a paperclip");
    println!();
}

/// How to reconnect the halves after flashing
pub fn print_post_flash_help() {
    println!();
    print_banner("✅ BOTH HALVES FLASHED!");
    println!();
    println!("📋 CONNECTION STEPS:");
    println!();
    println!("1️⃣  Check the power switches:");
    println!("   • Right half: ON = {}", Half::Right.power_on_direction());
    println!("   • Left half:  ON = {}", Half::Left.power_on_direction());
    println!();
    println!("2️⃣  Connect the TRRS cable between the halves");
    println!("   ⚠️  IMPORTANT: the TRRS plug must be fully seated on both sides");
    println!();
    println!("3️⃣  Plug USB into the LEFT half");
    println!("   💡 Left half = central");
    println!("   💡 Right half = peripheral");
    println!();
    println!("4️⃣  Wait 5-10 seconds for initialization");
    println!();
}

/// Shown once the image has been copied onto the bootloader drive
pub fn print_flashed(label: &str) {
    println!("✅ {} flashed successfully!", label);
    println!("   Unplug USB from this half.");
    println!();
}

pub fn print_volume_connected(mount_point: &Path) {
    println!("✅ Drive connected: {}", mount_point.display());
}

pub fn print_forced_unmount_attempt(detail: &str) {
    println!("⚠️  Normal unmount failed ({}), trying forced unmount...", detail);
}

pub fn print_forced_unmount_succeeded() {
    println!("✅ Forced unmount succeeded");
}

/// Shown before `btclear` touches either half
pub fn print_btclear_warning() {
    println!(
        "{} - ⚠️  The reset image is flashed on BOTH halves first, all BT pairings will be deleted!",
        timestamp()
    );
}

pub fn print_pairings_cleared() {
    println!();
    println!("✅ BT pairings cleared on both halves");
    println!("🔄 Flashing the main firmware (right → left)...");
}

pub fn print_btclear_complete() {
    println!();
    println!("✅ Both halves reflashed (reset + main firmware)");
}

pub fn print_waiting_for_disconnect(token: &str) {
    println!("⏳ Waiting for the {} drive to disconnect...", token);
}

pub fn print_disconnected() {
    println!("✅ Drive disconnected, you can continue");
    println!();
}

pub fn print_blank_line() {
    println!();
}
