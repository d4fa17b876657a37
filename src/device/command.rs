//! Command stream model and mode-transition formatter.
//!
//! Configurators never emit `exit` / `enable` / `conf t` themselves. They
//! build an ordered list of tagged blocks, and a single rendering pass owns
//! every mode transition, so the finished stream can be fed to an IOS prompt
//! line by line:
//!
//! - the stream opens with the device name, `enable`, `conf t`;
//! - every interface block is introduced by `exit`, `enable`, `conf t`;
//! - VLAN-database, DHCP-pool, and line blocks close with `exit`;
//! - the static-routes block is introduced by exactly `exit`, `enable`,
//!   once per device, even when the route list is empty;
//! - consecutive duplicate `exit` / `enable` lines collapse to one.

/// Configuration context a block runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Plain global-configuration commands.
    Global,
    /// VLAN database entries (`vlan <id>` / `name <name>`).
    VlanDb,
    /// One interface (or interface range) with its subcommands.
    Interface,
    /// One DHCP pool together with its excluded-address line.
    Pool,
    /// A `line vty` section.
    Line,
    /// The terminal static-routes block.
    Routes,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub kind: BlockKind,
    pub lines: Vec<String>,
}

/// Ordered command stream for one device.
#[derive(Debug, Clone)]
pub struct CommandStream {
    device_name: String,
    blocks: Vec<Block>,
}

impl CommandStream {
    pub fn new(device_name: impl Into<String>) -> Self {
        CommandStream {
            device_name: device_name.into(),
            blocks: Vec::new(),
        }
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn push(&mut self, kind: BlockKind, lines: Vec<String>) {
        self.blocks.push(Block { kind, lines });
    }

    pub fn push_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Render the final line stream, inserting all mode transitions.
    pub fn render(&self) -> Vec<String> {
        let mut out = vec![
            self.device_name.clone(),
            "enable".to_string(),
            "conf t".to_string(),
        ];

        let mut prev_kind: Option<BlockKind> = None;
        for block in &self.blocks {
            if block.lines.is_empty() && block.kind != BlockKind::Routes {
                continue;
            }
            match block.kind {
                BlockKind::Global => out.extend(block.lines.iter().cloned()),
                BlockKind::VlanDb | BlockKind::Line => {
                    out.extend(block.lines.iter().cloned());
                    out.push("exit".to_string());
                }
                BlockKind::Interface => {
                    out.push("exit".to_string());
                    out.push("enable".to_string());
                    out.push("conf t".to_string());
                    out.extend(block.lines.iter().cloned());
                }
                BlockKind::Pool => {
                    if prev_kind == Some(BlockKind::Interface) {
                        out.push("exit".to_string());
                        out.push("enable".to_string());
                        out.push("conf t".to_string());
                    }
                    out.extend(block.lines.iter().cloned());
                    out.push("exit".to_string());
                }
                BlockKind::Routes => {
                    out.push("exit".to_string());
                    out.push("enable".to_string());
                    out.extend(block.lines.iter().cloned());
                }
            }
            prev_kind = Some(block.kind);
        }

        if prev_kind != Some(BlockKind::Routes) {
            out.push("exit".to_string());
        }

        collapse_duplicates(out)
    }
}

/// Drop consecutive repeats of `exit` and `enable`.
fn collapse_duplicates(lines: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        if (line == "exit" || line == "enable") && out.last() == Some(&line) {
            continue;
        }
        out.push(line);
    }
    out
}
