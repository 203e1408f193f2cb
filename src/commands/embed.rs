//! Print the comment widget embed for a page

use anyhow::Result;

use crate::comments;
use crate::Site;

pub fn run(site: &Site, pathname: &str) -> Result<()> {
    println!("{}", comments::render_embed(&site.config.comments, pathname)?);
    Ok(())
}
