//! 单文件组件顶层区块拆分
//!
//! 只识别最外层结构: 一个 `<template>`、一个普通 `<script>`、一个
//! `<script setup>`。style 和自定义区块直接跳过。

use memchr::{memchr, memmem};
use thiserror::Error;

/// 超过该大小的文件拒绝解析
pub const MAX_UNIT_SIZE: usize = 10 * 1024 * 1024;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SfcError {
    #[error("unit too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },
    #[error("unclosed <{tag}> opening tag at byte {position}")]
    UnclosedTag { tag: String, position: usize },
    #[error("missing </{tag}> for block opened at byte {position}")]
    UnclosedBlock { tag: String, position: usize },
    #[error("duplicate {block} block at byte {position}")]
    DuplicateBlock { block: &'static str, position: usize },
}

pub type Result<T> = std::result::Result<T, SfcError>;

/// 顶层区块内容
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    pub content: &'a str,
}

#[derive(Debug, Clone, Default)]
pub struct SfcDescriptor<'a> {
    pub template: Option<Block<'a>>,
    pub script: Option<Block<'a>>,
    pub script_setup: Option<Block<'a>>,
}

impl<'a> SfcDescriptor<'a> {
    pub fn parse(source: &'a str) -> Result<Self> {
        if source.len() > MAX_UNIT_SIZE {
            return Err(SfcError::TooLarge {
                size: source.len(),
                max: MAX_UNIT_SIZE,
            });
        }

        let bytes = source.as_bytes();
        let mut descriptor = Self::default();
        let mut pointer = 0;

        while let Some(found) = memchr(b'<', &bytes[pointer..]) {
            let start = pointer + found;

            if bytes[start..].starts_with(b"<!--") {
                match memmem::find(&bytes[start + 4..], b"-->") {
                    Some(end) => {
                        pointer = start + 4 + end + 3;
                        continue;
                    }
                    None => break,
                }
            }

            let name_end = tag_name_end(bytes, start + 1);
            if name_end == start + 1 {
                // 孤立的 `<`、`</` 或普通文本
                pointer = start + 1;
                continue;
            }
            let tag = &source[start + 1..name_end];

            let open_end = find_closing_angle(bytes, name_end).ok_or_else(|| {
                SfcError::UnclosedTag {
                    tag: tag.to_string(),
                    position: start,
                }
            })?;
            let attributes = &source[name_end..open_end];
            let content_start = open_end + 1;

            let (content_end, next) = if bytes[open_end - 1] == b'/' {
                (content_start, content_start)
            } else {
                let found = if tag == "template" {
                    find_template_end(bytes, content_start)
                } else {
                    find_block_end(bytes, content_start, tag.as_bytes())
                };
                found.ok_or_else(|| SfcError::UnclosedBlock {
                    tag: tag.to_string(),
                    position: start,
                })?
            };

            let block = Block {
                content: &source[content_start..content_end],
            };
            match tag {
                "template" => assign(&mut descriptor.template, block, "template", start)?,
                "script" if is_setup(attributes) => {
                    assign(&mut descriptor.script_setup, block, "<script setup>", start)?
                }
                "script" => assign(&mut descriptor.script, block, "script", start)?,
                _ => {}
            }

            pointer = next;
        }

        Ok(descriptor)
    }

    /// 普通 script 在前，setup script 在后
    pub fn logic(&self) -> String {
        [self.script, self.script_setup]
            .iter()
            .flatten()
            .map(|b| b.content)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn has_logic(&self) -> bool {
        self.script.is_some() || self.script_setup.is_some()
    }

    pub fn template_content(&self) -> Option<&'a str> {
        self.template.map(|b| b.content)
    }
}

fn assign<'a>(
    slot: &mut Option<Block<'a>>,
    block: Block<'a>,
    name: &'static str,
    position: usize,
) -> Result<()> {
    if slot.is_some() {
        return Err(SfcError::DuplicateBlock {
            block: name,
            position,
        });
    }
    *slot = Some(block);
    Ok(())
}

fn is_setup(attributes: &str) -> bool {
    attributes
        .split(|c: char| c.is_whitespace() || c == '/')
        .any(|attr| attr == "setup" || attr.starts_with("setup="))
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

/// 标签名结束位置，没有标签名时等于 `start`
fn tag_name_end(bytes: &[u8], start: usize) -> usize {
    match bytes.get(start) {
        Some(b) if b.is_ascii_alphabetic() => {}
        _ => return start,
    }
    let mut end = start;
    while end < bytes.len() && is_name_byte(bytes[end]) {
        end += 1;
    }
    end
}

/// 开始标签的 `>`，跳过引号内的属性值
fn find_closing_angle(bytes: &[u8], start: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;

    for (i, &byte) in bytes[start..].iter().enumerate() {
        match (byte, quote) {
            (b'"' | b'\'', None) => quote = Some(byte),
            (b, Some(q)) if b == q => quote = None,
            (b'>', None) => return Some(start + i),
            _ => {}
        }
    }

    None
}

/// `bytes[at..]` 以 `needle` 开头且后面是标签边界
fn starts_tag(bytes: &[u8], at: usize, needle: &[u8]) -> bool {
    bytes[at..].starts_with(needle)
        && bytes
            .get(at + needle.len())
            .map_or(true, |&b| !is_name_byte(b))
}

/// 查找 `</tag>`，返回 (内容结束位置, 结束标签之后的位置)
fn find_block_end(bytes: &[u8], start: usize, tag: &[u8]) -> Option<(usize, usize)> {
    let mut needle = Vec::with_capacity(tag.len() + 2);
    needle.extend_from_slice(b"</");
    needle.extend_from_slice(tag);

    let finder = memmem::Finder::new(&needle);
    let mut cursor = start;
    while let Some(found) = finder.find(&bytes[cursor..]) {
        let close = cursor + found;
        if starts_tag(bytes, close, &needle) {
            let gt = memchr(b'>', &bytes[close..])?;
            return Some((close, close + gt + 1));
        }
        cursor = close + needle.len();
    }
    None
}

/// 顶层 template 对应的 `</template>`，计算嵌套 `<template>` (插槽、条件分组) 深度，
/// 跳过注释
fn find_template_end(bytes: &[u8], start: usize) -> Option<(usize, usize)> {
    let mut depth = 1usize;
    let mut cursor = start;

    while let Some(found) = memchr(b'<', &bytes[cursor..]) {
        let at = cursor + found;
        if bytes[at..].starts_with(b"<!--") {
            let end = memmem::find(&bytes[at + 4..], b"-->")?;
            cursor = at + 4 + end + 3;
        } else if starts_tag(bytes, at, b"</template") {
            depth -= 1;
            let gt = memchr(b'>', &bytes[at..])?;
            if depth == 0 {
                return Some((at, at + gt + 1));
            }
            cursor = at + gt + 1;
        } else if starts_tag(bytes, at, b"<template") {
            let gt = find_closing_angle(bytes, at + 9)?;
            if bytes[gt - 1] != b'/' {
                depth += 1;
            }
            cursor = gt + 1;
        } else {
            cursor = at + 1;
        }
    }

    None
}
