//! Standard end-of-project checklist

use crate::domain::contract::ChecklistItemInput;

pub struct ChecklistCategory {
    pub id: &'static str,
    pub label: &'static str,
    pub description: Option<&'static str>,
    pub items: &'static [&'static str],
}

pub const CHECKLIST_CATEGORY_IDS: [&str; 5] =
    ["MANAGEMENT", "CONTROLLING", "IT", "QUALITAET", "NACHHALTIGKEIT"];

pub const CHECKLIST_CATEGORIES: &[ChecklistCategory] = &[
    ChecklistCategory {
        id: "MANAGEMENT",
        label: "1. Management",
        description: None,
        items: &[
            "Auftrag Windream-Verzeichnisse und Projektleitung benennen",
            "Ziele/ Qualitätsstandards / Kennziffern bestimmen (Vertragscontrolling - inhaltlich)",
            "Aufbau- und Ablauforganisation entwerfen",
            "Projekt-/ Zeit-/ Meilensteinplanung",
            "Personaleinsatz und Qualifizierungen",
            "Durchführung einer Risikoanalyse",
            "Abstimmung des Antrags- und Nachweisprüfkonzepts (für Fördermittelprojekte)",
        ],
    },
    ChecklistCategory {
        id: "CONTROLLING",
        label: "2. Controlling / Finanzen / Personalverwaltung",
        description: None,
        items: &[
            "FiBu und Kostenstelle einrichten",
            "Bankkonten bei BFS einrichten",
            "Organisatorische Anlage des Projekts in Rexx (Festlegung der Projektzeiterfassungskategorie, ggf. Anlage einer neuen Organisationseinheit mit eigenen Stellen)",
        ],
    },
    ChecklistCategory {
        id: "IT",
        label: "3. IT / ISMS / Datenschutz / ProDaBa",
        description: None,
        items: &[
            "Abstimmung IT-Themen (Konzept und Bedarf)",
            "Zugriffsrechte für MA in windream beauftragen für „03 Programme\" bei Bedarf „13 Zahlungsverkehr\" (bei ZN/ VN Prüfung vorher Zugriffsbedarf GPT klären)",
            "Abstimmung mit ISMS-Beauftragten",
            "Abstimmung mit Datenschutzbeauftragten",
            "Beim Einsatz der ProDaBa - Abstimmung und Beantragung von Zugriffsrechten in Jira",
            "Beim Einsatz der ProDaBa – Programmstammdaten an Softwareentwicklung übermitteln (Jira-Ticket)",
            "Aufbewahrungsfrist der Unterlagen gemäß Vertrag bzw. gesetzlicher Regelung dokumentieren",
        ],
    },
    ChecklistCategory {
        id: "QUALITAET",
        label: "4. Qualität & Öffentlichkeitsarbeit",
        description: None,
        items: &[
            "Projektsteckbrief in Confluence erstellen",
            "Projekthandbuch (PHB) erstellen",
            "Kurzinformation über das Projekt in der Führungskräftesitzung",
            "Mitteilung an das Zentralsekretariat (Projektbeginn, E-Mail-Adresse, Telefonnummer/Hotline-Nummer, Hotline-Zeiten, verantwortliche*r Mitarbeiter*in)",
        ],
    },
    ChecklistCategory {
        id: "NACHHALTIGKEIT",
        label: "5. Nachhaltigkeit",
        description: Some(
            "Welche der folgenden 17 UN-Nachhaltigkeitsziele erfüllt das Projekt? Bitte ankreuzen.",
        ),
        items: &[
            "1. Keine Armut",
            "2. Kein Hunger",
            "3. Gesundheit und Wohlergehen",
            "4. Hochwertige Bildung",
            "5. Geschlechtergleichheit",
            "6. Sauberes Wasser und Sanitäreinrichtungen",
            "7. Bezahlbare und saubere Energie",
            "8. Menschenwürdige Arbeit und Wirtschaftswachstum",
            "9. Industrie, Innovation und Infrastruktur",
            "10. Weniger Ungleichheiten",
            "11. Nachhaltige Städte und Gemeinden",
            "12. Nachhaltiger Konsum und Produktion",
            "13. Maßnahmen zum Klimaschutz",
            "14. Leben unter Wasser",
            "15. Leben an Land",
            "16. Frieden, Gerechtigkeit und starke Institutionen",
            "17. Partnerschaften zur Erreichung der Ziele",
        ],
    },
];

/// Every standard item, unassigned and open, in category order
pub fn default_checklist() -> Vec<ChecklistItemInput> {
    CHECKLIST_CATEGORIES
        .iter()
        .flat_map(|category| {
            category.items.iter().map(move |label| ChecklistItemInput {
                category: category.id.to_owned(),
                label: (*label).to_owned(),
                assignee: None,
                remark: None,
                is_completed: false,
            })
        })
        .collect()
}

pub fn category_label(id: &str) -> &str {
    CHECKLIST_CATEGORIES
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.label)
        .unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_match_category_table() {
        let ids: Vec<_> = CHECKLIST_CATEGORIES.iter().map(|c| c.id).collect();
        assert_eq!(ids, CHECKLIST_CATEGORY_IDS);
    }

    #[test]
    fn default_checklist_covers_all_items() {
        let items = default_checklist();
        assert_eq!(items.len(), 7 + 3 + 7 + 4 + 17);
        assert_eq!(items[0].category, "MANAGEMENT");
        assert_eq!(items.last().unwrap().label, "17. Partnerschaften zur Erreichung der Ziele");
        assert!(items.iter().all(|i| !i.is_completed));
    }

    #[test]
    fn unknown_category_label_passes_through() {
        assert_eq!(category_label("IT"), "3. IT / ISMS / Datenschutz / ProDaBa");
        assert_eq!(category_label("SONST"), "SONST");
    }
}
