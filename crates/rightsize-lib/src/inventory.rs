//! Inventory reader
//!
//! Turns the tab-separated report printed by the collection scripts into
//! batch items. The report is split into sections:
//!
//! ```text
//! EC2 :
//! Instance Name	Instance Type	台数	CPU AvgMax	月額(USD)
//! web-1	t3a.large	1	10.0	$54.9
//!
//! Redis (ElastiCache) :
//! Cluster Name	Instance Type	台数	CPU AvgMax	月額(USD)
//! sessions	cache.t3.medium	2	55.2	N/A
//! ```
//!
//! Columns past the fourth are ignored. A JSON array of `BatchItem` is also
//! accepted.

use crate::error::InventoryError;
use crate::models::{BatchItem, Service};
use tracing::debug;

/// CPU cells that mean "no datapoints"
const MISSING_MARKERS: &[&str] = &["", "none", "n/a", "-", "null"];

/// Parse either inventory format, picking JSON when the text starts with `[`
pub fn read_inventory(text: &str) -> Result<Vec<BatchItem>, InventoryError> {
    if text.trim_start().starts_with('[') {
        parse_json_inventory(text)
    } else {
        parse_inventory(text)
    }
}

pub fn parse_json_inventory(text: &str) -> Result<Vec<BatchItem>, InventoryError> {
    Ok(serde_json::from_str(text)?)
}

/// Parse the sectioned, tab-separated report
pub fn parse_inventory(text: &str) -> Result<Vec<BatchItem>, InventoryError> {
    let mut items = Vec::new();
    let mut section: Option<Service> = None;
    let mut expect_header = false;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        if let Some(header) = section_header(line) {
            let service = section_service(header).ok_or_else(|| InventoryError::UnknownSection {
                line: line_no,
                header: header.to_string(),
            })?;
            debug!(line = line_no, %service, "Inventory section");
            section = Some(service);
            expect_header = true;
            continue;
        }

        let Some(service) = section else {
            return Err(InventoryError::RowOutsideSection { line: line_no });
        };

        let columns: Vec<&str> = line.split('\t').map(str::trim).collect();
        if expect_header {
            expect_header = false;
            if columns.get(2).map_or(true, |count| count.parse::<u32>().is_err()) {
                continue;
            }
        }

        items.push(parse_row(&columns, service, line_no)?);
    }

    Ok(items)
}

fn section_header(line: &str) -> Option<&str> {
    line.trim().strip_suffix(':').map(str::trim_end)
}

fn section_service(header: &str) -> Option<Service> {
    header.split_whitespace().next()?.parse().ok()
}

fn parse_row(columns: &[&str], service: Service, line: usize) -> Result<BatchItem, InventoryError> {
    if columns.len() < 4 {
        return Err(InventoryError::MissingColumns {
            line,
            found: columns.len(),
        });
    }

    let count = columns[2]
        .parse::<u32>()
        .map_err(|_| InventoryError::InvalidNumber {
            line,
            field: "count",
            value: columns[2].to_string(),
        })?;

    Ok(BatchItem::new(columns[0], columns[1], parse_cpu(columns[3], line)?, service).with_count(count))
}

fn parse_cpu(cell: &str, line: usize) -> Result<Option<f64>, InventoryError> {
    let value = cell.trim_end_matches('%').trim();
    if MISSING_MARKERS.contains(&value.to_ascii_lowercase().as_str()) {
        return Ok(None);
    }
    value
        .parse::<f64>()
        .map(Some)
        .map_err(|_| InventoryError::InvalidNumber {
            line,
            field: "cpu",
            value: cell.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "EC2 :
Instance Name\tInstance Type\t台数\tCPU AvgMax\t月額(USD)
web-1\tt3a.large\t1\t10.0\t$54.9
batch\tm5.xlarge\t2\tNone\tN/A

RDS :
Cluster Name\tInstance Type\t台数\tCPU AvgMax\t月額(USD)
orders\tdb.r5.large\t2\t15.5\t$365.0

DocumentDB :
Cluster Name\tInstance Type\t台数\tCPU AvgMax\t月額(USD)

Redis (ElastiCache) :
Cluster Name\tInstance Type\t台数\tCPU AvgMax\t月額(USD)
sessions\tcache.t3.medium\t3\t55%\tN/A

Memcached (ElastiCache) :
Cluster Name\tInstance Type\t台数\tCPU AvgMax\t月額(USD)
fragments\tcache.m5.large\t1\t-\tN/A
";

    #[test]
    fn test_sections_map_to_services() {
        let items = parse_inventory(REPORT).unwrap();
        let summary: Vec<_> = items
            .iter()
            .map(|i| (i.name.as_str(), i.service, i.count, i.utilization))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("web-1", Service::Ec2, 1, Some(10.0)),
                ("batch", Service::Ec2, 2, None),
                ("orders", Service::Rds, 2, Some(15.5)),
                ("sessions", Service::Elasticache, 3, Some(55.0)),
                ("fragments", Service::Elasticache, 1, None),
            ]
        );
        assert_eq!(items[2].instance_type, "db.r5.large");
    }

    #[test]
    fn test_header_line_is_optional() {
        let items = parse_inventory("RDS :\norders\tdb.r5.large\t1\t12\n").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].utilization, Some(12.0));
    }

    #[test]
    fn test_row_before_section_rejected() {
        let err = parse_inventory("web-1\tt3.large\t1\t10\n").unwrap_err();
        assert!(matches!(err, InventoryError::RowOutsideSection { line: 1 }));
    }

    #[test]
    fn test_unknown_section_rejected() {
        let err = parse_inventory("Lambda :\n").unwrap_err();
        assert!(matches!(err, InventoryError::UnknownSection { line: 1, .. }));
    }

    #[test]
    fn test_malformed_rows_report_line_numbers() {
        let text = "EC2 :\nName\tType\t台数\tCPU\nweb-1\tt3.large\n";
        let err = parse_inventory(text).unwrap_err();
        assert!(matches!(err, InventoryError::MissingColumns { line: 3, found: 2 }));

        let text = "EC2 :\nName\tType\t台数\tCPU\nweb-1\tt3.large\t1\thigh\n";
        let err = parse_inventory(text).unwrap_err();
        assert!(matches!(
            err,
            InventoryError::InvalidNumber { line: 3, field: "cpu", .. }
        ));

        let text = "EC2 :\nName\tType\t台数\tCPU\nweb-1\tt3.large\t1\t10\nweb-2\tt3.large\tmany\t10\n";
        let err = parse_inventory(text).unwrap_err();
        assert!(matches!(
            err,
            InventoryError::InvalidNumber { line: 4, field: "count", .. }
        ));
    }

    #[test]
    fn test_json_inventory_detected() {
        let json = r#"[{"name": "web", "instance_type": "t3.large", "utilization": 12.0, "service": "ec2"}]"#;
        let items = read_inventory(json).unwrap();
        assert_eq!(
            items,
            vec![BatchItem::new("web", "t3.large", Some(12.0), Service::Ec2)]
        );

        assert!(matches!(read_inventory("[{"), Err(InventoryError::Json(_))));
    }
}
