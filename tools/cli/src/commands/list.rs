//! `list`: all available registers with their current widths.

use super::Context;

pub fn run(ctx: &mut Context) -> Result<(), String> {
    let mode = ctx.mode().map_err(|e| e.to_string())?;
    let svl = ctx.vector_length().map_err(|e| e.to_string())?;
    println!("mode: {}, streaming vector length: {} bytes", mode, svl);

    for reg in ctx.list_registers().map_err(|e| e.to_string())? {
        println!("{:<6} {:>6} bytes  {:?}", reg.name, reg.width, reg.backing);
    }
    Ok(())
}
