// ==========================================
// 学生名册管理系统 - 文本解析器
// ==========================================
// 输入: 逗号分隔文本（字节流），首行为表头
// 输出: 表头 + 原始行（已 trim，保留文件行号）+ 行级解析失败
// 约束: 逐物理行解析，坏行（未闭合引号/非 UTF-8）只影响本行
//       字段内不支持换行
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use csv::{ByteRecord, ReaderBuilder};
use std::path::Path;

/// 原始数据行
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub line_number: usize, // 文件行号（表头为 1）
    pub fields: Vec<String>,
}

/// 解析结果
#[derive(Debug, Default)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
    pub rejected: Vec<ImportError>, // 行级错误（编码/格式），按行号升序
}

// ==========================================
// CSV Parser
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// 解析内存中的文本
    pub fn parse_str(text: &str) -> ImportResult<ParsedTable> {
        Self::parse_bytes(text.as_bytes())
    }

    /// 解析字节流
    pub fn parse_bytes(bytes: &[u8]) -> ImportResult<ParsedTable> {
        let mut table = ParsedTable::default();
        let mut lines = bytes.split(|b| *b == b'\n').enumerate();

        // 读取表头（只用于识别列数，非 UTF-8 字节按替换字符处理）
        let Some((_, header_line)) = lines.next() else {
            return Ok(table);
        };
        if let Some(record) = read_line(header_line)? {
            table.headers = record
                .iter()
                .map(|h| String::from_utf8_lossy(h).trim().to_string())
                .filter(|h| !h.is_empty())
                .collect();
        }

        for (idx, line) in lines {
            let line_number = idx + 1;

            let record = match read_line(line) {
                Ok(Some(r)) => r,
                Ok(None) => continue,
                Err(e) => {
                    table.rejected.push(ImportError::MalformedRow {
                        row: line_number,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let Some(fields) = decode_fields(&record) else {
                table.rejected.push(ImportError::Encoding { row: line_number });
                continue;
            };

            // 跳过完全空白的行
            if fields.iter().all(|v| v.is_empty()) {
                continue;
            }

            table.rows.push(RawRow {
                line_number,
                fields,
            });
        }

        Ok(table)
    }

    /// 解析文件
    pub fn parse_file(path: &Path) -> ImportResult<ParsedTable> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| ImportError::FileRead(format!("{}: {}", path.display(), e)))?;
        Self::parse_bytes(&bytes)
    }
}

/// 单行独立解析；空行返回 None
fn read_line(line: &[u8]) -> Result<Option<ByteRecord>, csv::Error> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // 列数由 FieldMapper 判定
        .from_reader(line);

    let mut record = ByteRecord::new();
    if reader.read_byte_record(&mut record)? {
        Ok(Some(record))
    } else {
        Ok(None)
    }
}

/// 逐字段 UTF-8 解码并 trim；任一字段非法返回 None
fn decode_fields(record: &ByteRecord) -> Option<Vec<String>> {
    record
        .iter()
        .map(|v| std::str::from_utf8(v).ok().map(|s| s.trim().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_str_trims_and_numbers_lines() {
        let text = "Student ID, Full Name ,Programme,GPA,Status\n\
                    S001 , Ama Owusu ,Biology,3.20,Active\n\
                    \n\
                    S002,Kofi Mensah,Physics,1.10,Inactive\n";
        let table = CsvParser::parse_str(text).unwrap();

        assert_eq!(table.headers.len(), 5);
        assert_eq!(table.headers[1], "Full Name");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].line_number, 2);
        assert_eq!(table.rows[0].fields[0], "S001");
        assert_eq!(table.rows[0].fields[1], "Ama Owusu");
        assert_eq!(table.rows[1].line_number, 4);
    }

    #[test]
    fn test_parse_skips_all_blank_fields() {
        let text = "a,b,c,d,e\n,,,,\nS001,Ama,Bio,3.0,Active\n";
        let table = CsvParser::parse_str(text).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].line_number, 3);
    }

    #[test]
    fn test_parse_quoted_comma() {
        let text = "a,b,c,d,e\nS001,\"Owusu, Ama\",Bio,3.0,Active\n";
        let table = CsvParser::parse_str(text).unwrap();
        assert_eq!(table.rows[0].fields[1], "Owusu, Ama");
        assert_eq!(table.rows[0].fields.len(), 5);
    }

    #[test]
    fn test_unclosed_quote_only_fails_own_line() {
        let text = "a,b,c,d,e\n\
                    STU001,\"Ama Owusu,Biology,3.10,Active\n\
                    STU002,Kofi Mensah,Physics,2.50,Active\n\
                    STU003,Esi Addo,Law,3.00,Active\n";
        let table = CsvParser::parse_str(text).unwrap();

        let valid: Vec<(usize, &str)> = table
            .rows
            .iter()
            .filter(|r| r.fields.len() == 5)
            .map(|r| (r.line_number, r.fields[0].as_str()))
            .collect();
        assert_eq!(valid, vec![(3, "STU002"), (4, "STU003")]);

        // 第 2 行要么是列数不足的原始行，要么是行级错误
        let line2_row = table.rows.iter().any(|r| r.line_number == 2 && r.fields.len() < 5);
        let line2_err = table.rejected.iter().any(|e| e.row() == Some(2));
        assert!(line2_row || line2_err);
    }

    #[test]
    fn test_invalid_utf8_rejected_per_row() {
        let mut bytes = b"a,b,c,d,e\r\nS001,Ama Owusu,Bio,3.0,Active\r\nS002,Ren".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"e Adjei,Bio,3.0,Active\r\nS003,Esi Addo,Law,2.0,Active\r\n");

        let table = CsvParser::parse_bytes(&bytes).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].fields[4], "Active");
        assert_eq!(table.rows[1].line_number, 4);
        assert_eq!(table.rejected.len(), 1);
        assert!(matches!(table.rejected[0], ImportError::Encoding { row: 3 }));
    }

    #[test]
    fn test_parse_file_missing() {
        let err = CsvParser::parse_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, ImportError::FileNotFound(_)));
    }
}
