//! `write <name> <value>`: store a value into one register.
//!
//! Values are byte-vector literals like `{0x12 0x34}` or hex scalars
//! like `0xaaaaaaaa`; scalars are zero-extended to the register's
//! current width.

use regctx_core::RegisterValue;

use super::Context;

pub fn run(ctx: &mut Context, name: &str, literal: &str) -> Result<(), String> {
    let snapshot = ctx.snapshot().map_err(|e| e.to_string())?;
    let desc = ctx.catalog().describe(name).map_err(|e| e.to_string())?;
    let width = snapshot.width_of(desc);
    let name = desc.name.clone();

    let value = RegisterValue::parse_sized(literal, width).map_err(|e| e.to_string())?;
    let outcome = ctx
        .write_register(&name, &value)
        .map_err(|e| e.to_string())?;

    if outcome.discarded > 0 {
        println!(
            "wrote {}; {} bytes beyond the SIMD overlay were discarded",
            name, outcome.discarded
        );
    }
    if let Some(status) = outcome.transition {
        println!("note: thread entered {} mode", status.mode);
    }
    Ok(())
}
