//! Codes command for listing the known time codes.

use std::io::Write;

use anyhow::Result;

use crate::Config;
use crate::codes::{known_codes, load_codes};
use crate::store::LogFile;

pub fn run<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let file_codes = load_codes(&config.code_file)?;
    let log_file = LogFile::open(&config.log_file)?;
    let codes = known_codes(&file_codes, &log_file.log);

    if codes.is_empty() {
        writeln!(writer, "No codes defined.")?;
        return Ok(());
    }

    for code in codes {
        writeln!(writer, "{code}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    #[test]
    fn test_codes_lists_file_and_log_codes() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config {
            log_file: temp.path().join("timeclock.log"),
            code_file: temp.path().join("codes.txt"),
            round_minutes: 6,
        };
        std::fs::write(&config.code_file, "# known codes\nClient:Web\nAdmin\n").unwrap();
        std::fs::write(&config.log_file, "2023/07/06 09:36AM [Adhoc] x\n").unwrap();

        let mut output = Vec::new();
        run(&mut output, &config).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        Adhoc
        Admin
        Client:Web
        ");
    }

    #[test]
    fn test_codes_with_nothing_defined() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config {
            log_file: temp.path().join("timeclock.log"),
            code_file: temp.path().join("codes.txt"),
            round_minutes: 6,
        };

        let mut output = Vec::new();
        run(&mut output, &config).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "No codes defined.\n");
    }
}
