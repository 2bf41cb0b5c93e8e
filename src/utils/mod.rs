use std::path::Path;

/// Escape text for use in HTML content and double- or single-quoted
/// attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

/// Date part of an ISO-8601 timestamp: everything before the first `T`.
pub fn date_part(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or(timestamp)
}

/// Last path component of a local file, as sent in `STOR`.
pub fn remote_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "index.html".to_string())
}

/// Fully-qualified upload target used when changing into `remote_dir` fails.
pub fn qualified_remote_path(remote_dir: &str, file_name: &str) -> String {
    if remote_dir.is_empty() || remote_dir.ends_with('/') {
        format!("{}{}", remote_dir, file_name)
    } else {
        format!("{}/{}", remote_dir, file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("plain"), "plain");
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;/b&gt;"
        );
        assert_eq!(escape_html("Tóra"), "Tóra");
    }

    #[test]
    fn test_date_part() {
        assert_eq!(date_part("2009-10-25T06:57:33Z"), "2009-10-25");
        assert_eq!(date_part("2009-10-25"), "2009-10-25");
        assert_eq!(date_part(""), "");
    }

    #[test]
    fn test_remote_paths() {
        assert_eq!(remote_file_name(&PathBuf::from("out/index.html")), "index.html");
        assert_eq!(qualified_remote_path("/public_html/", "index.html"), "/public_html/index.html");
        assert_eq!(qualified_remote_path("/public_html", "index.html"), "/public_html/index.html");
        assert_eq!(qualified_remote_path("", "index.html"), "index.html");
    }
}
