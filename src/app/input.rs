//! Input line parsing for the CLI runner.

/// Parses one `identifier ip` input line.
///
/// The two fields are separated by a comma and/or whitespace. Blank lines and
/// `#` comments yield `None`. A line with only an identifier yields an empty
/// address; the queue completes such jobs as soft failures.
pub fn parse_job_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let mut fields = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|field| !field.is_empty());
    let identifier = fields.next()?;
    let ip = fields.next().unwrap_or("");
    Some((identifier.to_string(), ip.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(id: &str, ip: &str) -> Option<(String, String)> {
        Some((id.to_string(), ip.to_string()))
    }

    #[test]
    fn test_whitespace_separated() {
        assert_eq!(parse_job_line("c1 8.8.8.8"), pair("c1", "8.8.8.8"));
        assert_eq!(parse_job_line("  c1\t\t8.8.8.8  "), pair("c1", "8.8.8.8"));
    }

    #[test]
    fn test_comma_separated() {
        assert_eq!(parse_job_line("c1,8.8.8.8"), pair("c1", "8.8.8.8"));
        assert_eq!(parse_job_line("c1, ::ffff:1.2.3.4"), pair("c1", "::ffff:1.2.3.4"));
    }

    #[test]
    fn test_skips_blank_and_comments() {
        assert_eq!(parse_job_line(""), None);
        assert_eq!(parse_job_line("   "), None);
        assert_eq!(parse_job_line("# contacts exported 2024-01-01"), None);
    }

    #[test]
    fn test_identifier_without_address() {
        assert_eq!(parse_job_line("c2"), pair("c2", ""));
        assert_eq!(parse_job_line("c2,"), pair("c2", ""));
    }

    #[test]
    fn test_extra_fields_ignored() {
        assert_eq!(parse_job_line("c1 8.8.8.8 extra"), pair("c1", "8.8.8.8"));
    }
}
