use anyhow::Result;

use vimeo_dl::resolve;

pub fn cmd_resolve(url: &str) -> Result<()> {
    let resolved = resolve(url)?;

    println!("id: {}", resolved.id);
    println!("shape: {}", resolved.shape);
    println!("url: {}", resolved.normalized);
    if let Some(ref hash) = resolved.unlisted_hash {
        println!("hash: {hash}");
    }
    for (key, value) in &resolved.query {
        println!("param: {key}={value}");
    }

    Ok(())
}
