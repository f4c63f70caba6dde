//! Human readable tree dumps.
//!
//! Nodes are written depth first, left before right, one block per node:
//!
//! ```text
//! Left: <left child hash>        or   Input
//! Right: <right child hash>
//! (Padding)                           only for padding nodes
//! Value: <hash>
//! Content: <content>
//! ```
//!
//! Each level of the tree is indented one step further.

use std::io::{self, Write};

use itertools::{Itertools, Position};

use crate::{MerkleHasher, MerkleTree, NodeId};

const INDENT_SPACES: usize = 4;
const HEX_LEN: usize = 8;

/// Pretty visualization of tree components.
pub trait Visualize {
    /// Write `self` through `drawer`, handing the drawer back for chaining.
    fn visualize<W: Write>(&self, drawer: Drawer<W>) -> io::Result<Drawer<W>>;
}

/// An `io::Write` proxy indenting every line by the current level.
pub struct Drawer<W: Write> {
    level: usize,
    at_line_start: bool,
    write: W,
}

impl<W: Write> Drawer<W> {
    /// Drawer at level zero.
    pub fn new(write: W) -> Self {
        Drawer {
            level: 0,
            at_line_start: true,
            write,
        }
    }

    /// Indent following lines one more step.
    pub fn down(&mut self) {
        self.level += 1;
    }

    /// Indent following lines one step less.
    pub fn up(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    /// Write `buf`, indenting every non-empty line.
    pub fn write(&mut self, buf: &[u8]) -> io::Result<()> {
        for (position, line) in buf.split(|c| *c == b'\n').with_position() {
            if !line.is_empty() {
                if self.at_line_start {
                    let indent = " ".repeat(INDENT_SPACES * self.level);
                    self.write.write_all(indent.as_bytes())?;
                }
                self.write.write_all(line)?;
                self.at_line_start = false;
            }
            if matches!(position, Position::First | Position::Middle) {
                self.write.write_all(b"\n")?;
                self.at_line_start = true;
            }
        }
        Ok(())
    }

    /// Terminate the current line and flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        if !self.at_line_start {
            self.write.write_all(b"\n")?;
            self.at_line_start = true;
        }
        self.write.flush()
    }
}

/// Shortened hex for byte strings that are not valid UTF-8.
pub fn to_hex(bytes: &[u8]) -> String {
    let encoded = hex::encode(bytes);
    let remaining = encoded.len().saturating_sub(HEX_LEN);
    if remaining >= HEX_LEN {
        format!("{}..{}", &encoded[0..HEX_LEN], &encoded[remaining..])
    } else {
        encoded
    }
}

/// Content as text when it is UTF-8, `[hex: ..]` otherwise.
pub fn render_content(content: &[u8]) -> String {
    match std::str::from_utf8(content) {
        Ok(text) => text.to_string(),
        Err(_) => format!("[hex: {}]", to_hex(content)),
    }
}

impl<H: MerkleHasher> MerkleTree<H> {
    fn visualize_node<W: Write>(&self, id: NodeId, mut drawer: Drawer<W>) -> io::Result<Drawer<W>> {
        let Some(node) = self.node(id) else {
            drawer.write(format!("<missing node {id}>\n").as_bytes())?;
            return Ok(drawer);
        };
        match node.children() {
            Some((left, right)) => {
                let hash_of = |child: NodeId| {
                    self.node(child)
                        .map(|n| n.hash().to_hex())
                        .unwrap_or_else(|| format!("<missing node {child}>"))
                };
                drawer.write(format!("Left: {}\n", hash_of(left)).as_bytes())?;
                drawer.write(format!("Right: {}\n", hash_of(right)).as_bytes())?;
            }
            None => drawer.write(b"Input\n")?,
        }
        if node.is_padding() {
            drawer.write(b"(Padding)\n")?;
        }
        drawer.write(format!("Value: {}\n", node.hash()).as_bytes())?;
        drawer.write(format!("Content: {}\n\n", render_content(node.content())).as_bytes())?;

        if let Some((left, right)) = node.children() {
            drawer.down();
            drawer = self.visualize_node(left, drawer)?;
            drawer = self.visualize_node(right, drawer)?;
            drawer.up();
        }
        Ok(drawer)
    }
}

impl<H: MerkleHasher> Visualize for MerkleTree<H> {
    fn visualize<W: Write>(&self, mut drawer: Drawer<W>) -> io::Result<Drawer<W>> {
        drawer.write(format!("Root Hash ({}): {}\n\n", H::NAME, self.root_hash()).as_bytes())?;
        self.visualize_node(self.root(), drawer)
    }
}

/// `visualize` shortcut to write straight into stdout.
pub fn visualize_stdout<T: Visualize + ?Sized>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut drawer = value.visualize(Drawer::new(stdout.lock()))?;
    drawer.flush()
}

/// `visualize` shortcut to write into a growable buffer.
pub fn visualize_to_vec<T: Visualize + ?Sized>(v: &mut Vec<u8>, value: &T) -> io::Result<()> {
    let mut drawer = value.visualize(Drawer::new(v))?;
    drawer.flush()
}
