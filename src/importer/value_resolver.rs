// ==========================================
// 商品目录表格导入 - 属性值解析器
// ==========================================
// 职责: 属性列单元格 → 规范化属性条目（按输入类型分派载荷键）
// 商品行与变体行共用同一入口
// 红线: 值未命中只跳过该值，整行继续
// ==========================================

use crate::domain::record::{
    AttributeValuePayload, NormalizedAttributeEntry, RawRow, SkipReason,
};
use crate::importer::attribute_lookup::AttributeCatalog;
use crate::importer::data_cleaner::DataCleaner;
use tracing::{debug, warn};

/// 单个属性值的解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(NormalizedAttributeEntry),
    Skipped(SkipReason),
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }
}

/// 解析一行中所有已映射的属性列
///
/// # 参数
/// - row: 原始行
/// - columns: (列头, 属性标识) 列表，按目录顺序
/// - catalog: 属性目录快照
///
/// # 返回
/// 按列顺序、列内按拆分顺序排列的解析结果
pub fn resolve_attribute_entries(
    row: &RawRow,
    columns: &[(String, String)],
    catalog: &AttributeCatalog,
) -> Vec<Resolution> {
    let cleaner = DataCleaner;
    let mut resolutions = Vec::new();

    for (header, attribute_id) in columns {
        let Some(cell) = row.get(header) else {
            continue;
        };

        let Some(attribute) = catalog.attribute(attribute_id) else {
            // 映射来自同一快照，正常不会发生
            debug!(column = %header, attribute_id = %attribute_id, "属性不在快照中，忽略该列");
            continue;
        };

        for raw_value in cleaner.split_multi_value(cell) {
            match catalog.find_value(attribute_id, &raw_value) {
                Some(value) => {
                    resolutions.push(Resolution::Resolved(NormalizedAttributeEntry {
                        id: attribute.id.clone(),
                        payload: AttributeValuePayload::for_input_type(
                            &attribute.input_type,
                            value.id.clone(),
                        ),
                    }));
                }
                None => {
                    warn!(
                        row = row.row_number,
                        column = %header,
                        value = %raw_value,
                        "属性值未找到，跳过"
                    );
                    resolutions.push(Resolution::Skipped(SkipReason::UnknownAttributeValue {
                        column: header.clone(),
                        value: raw_value,
                    }));
                }
            }
        }
    }

    resolutions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{AttributeDefinition, AttributeValue};
    use crate::domain::record::{CellValue, ValueRef};
    use crate::domain::types::{AttributeScope, InputType};
    use crate::importer::attribute_lookup::build_mapping;
    use serde_json::json;

    fn value(id: &str, attribute_id: &str, name: &str) -> AttributeValue {
        AttributeValue {
            id: id.to_string(),
            attribute_id: attribute_id.to_string(),
            name: name.to_string(),
        }
    }

    fn catalog() -> AttributeCatalog {
        AttributeCatalog::new(
            vec![
                AttributeDefinition {
                    id: "A1".to_string(),
                    name: "Color".to_string(),
                    input_type: InputType::Dropdown,
                    scope: AttributeScope::Product,
                },
                AttributeDefinition {
                    id: "A2".to_string(),
                    name: "Size".to_string(),
                    input_type: InputType::Multiselect,
                    scope: AttributeScope::Product,
                },
                AttributeDefinition {
                    id: "A3".to_string(),
                    name: "Finish".to_string(),
                    input_type: InputType::Unknown("color_wheel".to_string()),
                    scope: AttributeScope::Product,
                },
            ],
            vec![
                value("V1", "A1", "Red"),
                value("V2", "A2", "S"),
                value("V3", "A2", "M"),
                value("V4", "A2", "L"),
                value("V5", "A3", "Matte"),
            ],
        )
    }

    fn resolved_ids(resolutions: &[Resolution]) -> Vec<String> {
        resolutions
            .iter()
            .filter_map(|r| match r {
                Resolution::Resolved(entry) => Some(entry.payload.value_id().to_string()),
                Resolution::Skipped(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_color_red_round_trip() {
        let catalog = catalog();
        let row = RawRow::from_pairs(2, [("color", "Red")]);
        let mapping = build_mapping(&row, &catalog);

        let resolutions = resolve_attribute_entries(&row, &mapping.product_columns, &catalog);
        assert_eq!(resolutions.len(), 1);

        let Resolution::Resolved(entry) = &resolutions[0] else {
            panic!("expected resolved entry");
        };
        assert_eq!(
            serde_json::to_value(entry).unwrap(),
            json!({"id": "A1", "dropdown": {"id": "V1"}})
        );
    }

    #[test]
    fn test_multi_value_split_keeps_order_and_skips_unknown() {
        let catalog = catalog();
        let row = RawRow::from_pairs(2, [("Size", "S, XL ,M,")]);
        let mapping = build_mapping(&row, &catalog);

        let resolutions = resolve_attribute_entries(&row, &mapping.product_columns, &catalog);
        assert_eq!(resolutions.len(), 3);
        assert_eq!(resolved_ids(&resolutions), vec!["V2", "V3"]);
        assert_eq!(
            resolutions[1],
            Resolution::Skipped(SkipReason::UnknownAttributeValue {
                column: "Size".to_string(),
                value: "XL".to_string(),
            })
        );
        assert!(matches!(
            &resolutions[0],
            Resolution::Resolved(NormalizedAttributeEntry {
                payload: AttributeValuePayload::Multiselect(_),
                ..
            })
        ));
    }

    #[test]
    fn test_value_match_is_case_sensitive() {
        let catalog = catalog();
        let row = RawRow::from_pairs(2, [("Color", "red")]);
        let mapping = build_mapping(&row, &catalog);

        let resolutions = resolve_attribute_entries(&row, &mapping.product_columns, &catalog);
        assert_eq!(resolutions.len(), 1);
        assert!(!resolutions[0].is_resolved());
    }

    #[test]
    fn test_list_cell_used_as_is() {
        let catalog = catalog();
        let mut row = RawRow::new(2);
        row.insert(
            "Size",
            CellValue::List(vec![CellValue::from("L"), CellValue::from("S")]),
        );
        let mapping = build_mapping(&row, &catalog);

        let resolutions = resolve_attribute_entries(&row, &mapping.product_columns, &catalog);
        assert_eq!(resolved_ids(&resolutions), vec!["V4", "V2"]);
    }

    #[test]
    fn test_unknown_input_type_falls_back_to_dropdown() {
        let catalog = catalog();
        let row = RawRow::from_pairs(2, [("Finish", "Matte")]);
        let mapping = build_mapping(&row, &catalog);

        let resolutions = resolve_attribute_entries(&row, &mapping.product_columns, &catalog);
        assert_eq!(
            resolutions,
            vec![Resolution::Resolved(NormalizedAttributeEntry {
                id: "A3".to_string(),
                payload: AttributeValuePayload::Dropdown(ValueRef {
                    id: "V5".to_string()
                }),
            })]
        );
    }

    #[test]
    fn test_empty_cell_produces_nothing() {
        let catalog = catalog();
        let row = RawRow::from_pairs(2, [("Color", "  ")]);
        let mapping = build_mapping(&row, &catalog);

        assert!(resolve_attribute_entries(&row, &mapping.product_columns, &catalog).is_empty());
    }
}
