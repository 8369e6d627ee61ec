//! `read <name>...`: print one line per register, `name = value`.

use regctx_core::fields_for;

use super::{Context, prints_as_scalar};

pub fn run(ctx: &mut Context, names: &[&str]) -> Result<(), String> {
    if names.is_empty() {
        return Err("usage: read <register>...".to_string());
    }

    for name in names {
        let value = ctx
            .read_register(name)
            .map_err(|e| e.to_string())?;
        let desc = ctx.catalog().describe(name).map_err(|e| e.to_string())?;

        let rendered = if prints_as_scalar(desc.class) {
            value.to_hex_scalar()
        } else {
            value.to_vector_literal()
        };

        let capabilities = ctx.catalog().capabilities();
        match fields_for(&desc.name, &capabilities) {
            Some(fields) => {
                println!("{} = {} ({})", desc.name, rendered, fields.describe(&value))
            }
            None => println!("{} = {}", desc.name, rendered),
        }
    }
    Ok(())
}
