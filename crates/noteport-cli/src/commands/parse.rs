use anyhow::Result;
use noteport_config::NoteportConfig;
use noteport_core::{Block, PropertyMap};
use noteport_parser::{BlockParser, SourceFormat};
use serde::Serialize;
use std::path::Path;

use crate::output;
use crate::vault::read_document;

/// JSON shape printed by `noteport parse`
#[derive(Debug, Serialize)]
struct ParseOutput<'a> {
    path: &'a str,
    format: SourceFormat,
    properties: &'a PropertyMap,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    block_ids: Vec<String>,
    blocks: Vec<Block>,
}

/// Execute the parse command
pub async fn execute(config: &NoteportConfig, file: &Path) -> Result<()> {
    let document = read_document(file)?;
    let format = document.source_format(config.import.format);
    let header = document.parse_header(config.import.format);
    let blocks = BlockParser::new().parse(&header.body);

    let parsed = ParseOutput {
        path: &document.path,
        format,
        properties: &header.properties,
        block_ids: header.block_ids.clone(),
        blocks,
    };
    println!("{}", output::to_json(&parsed)?);
    Ok(())
}
