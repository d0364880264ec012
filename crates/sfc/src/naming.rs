//! 组件命名规则

use std::path::{Component, Path};

/// kebab-case -> PascalCase，空段丢弃，其余字符保持原样
pub fn to_pascal_case(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// 模板标签的规范名 (只转换带连字符的写法)
pub fn normalize_tag(tag: &str) -> String {
    if tag.contains('-') {
        to_pascal_case(tag)
    } else {
        tag.to_string()
    }
}

/// 纯小写单词标签视为内置元素
pub fn is_builtin_tag(tag: &str) -> bool {
    !tag.is_empty() && tag.bytes().all(|b| b.is_ascii_lowercase())
}

/// 由文件名得到组件名
pub fn component_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    to_pascal_case(&stem)
}

/// 相对项目根目录的路径 (`/` 分隔)，不在根目录下则原样返回
pub fn relative_path(path: &Path, project_root: &Path) -> String {
    match path.strip_prefix(project_root) {
        Ok(relative) => relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.to_string_lossy().into_owned(),
    }
}
