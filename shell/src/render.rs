use personas_core::{FilterKind, Persona, PersonaField, PersonasScreen};
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// A row in the registry table. `row` is 1-based, as typed in commands.
#[derive(Tabled)]
struct PersonaRow {
    #[tabled(rename = "#")]
    row: usize,
    #[tabled(rename = "Identificación")]
    identification: String,
    #[tabled(rename = "Apellidos")]
    last_name: String,
    #[tabled(rename = "Nombres")]
    first_name: String,
    #[tabled(rename = "RUC")]
    ruc: String,
    #[tabled(rename = "Código")]
    code: String,
    #[tabled(rename = "Verificado")]
    verified: String,
    #[tabled(rename = "Razón Social")]
    legal_name: String,
}

impl PersonaRow {
    fn new(row: usize, persona: &Persona) -> Self {
        Self {
            row,
            identification: persona.identification.clone(),
            last_name: persona.last_name.clone(),
            first_name: persona.first_name.clone(),
            ruc: persona.ruc.clone(),
            code: persona.code.clone(),
            verified: persona.verified.clone(),
            legal_name: persona.legal_name.clone(),
        }
    }
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Campo")]
    label: &'static str,
    #[tabled(rename = "Nombre")]
    name: &'static str,
    #[tabled(rename = "Valor")]
    value: String,
}

/// The filter buttons, the table and a status line.
pub fn screen(screen: &PersonasScreen) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "[{}]  [{}]\n",
        filter_button(screen, FilterKind::Ruc),
        filter_button(screen, FilterKind::Verified)
    ));

    if screen.displayed_len() == 0 {
        out.push_str("No personas to show.\n");
    } else {
        let rows: Vec<PersonaRow> = screen
            .displayed()
            .enumerate()
            .map(|(i, persona)| PersonaRow::new(i + 1, persona))
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        out.push_str(&format!("{table}\n"));
    }

    out.push_str(&status_line(screen));
    out
}

/// The edit modal, or `None` when it is closed.
pub fn modal(screen: &PersonasScreen) -> Option<String> {
    if !screen.editor().is_visible() {
        return None;
    }
    let buffer = screen.editor().buffer()?;
    let rows: Vec<FieldRow> = PersonaField::ALL
        .iter()
        .map(|&field| FieldRow {
            label: field.label(),
            name: field.wire_name(),
            value: buffer.field(field).to_string(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    Some(format!("Editar Persona\n{table}\n[save] Guardar  [close] Cerrar"))
}

fn filter_button(screen: &PersonasScreen, kind: FilterKind) -> &'static str {
    match (kind, screen.is_filter_enabled(kind)) {
        (FilterKind::Ruc, false) => "ruc: Filtrar por RUC",
        (FilterKind::Ruc, true) => "ruc: Limpiar Filtro RUC",
        (FilterKind::Verified, false) => "verified: Filtrar por Verificados",
        (FilterKind::Verified, true) => "verified: Limpiar Filtro Verificados",
    }
}

fn status_line(screen: &PersonasScreen) -> String {
    let loader = screen.loader();
    let paging = if loader.is_loading() {
        "loading".to_string()
    } else if loader.has_more() {
        format!("next page {}", loader.page())
    } else {
        "end of registry".to_string()
    };
    format!(
        "{} shown of {} loaded | {paging}",
        screen.displayed_len(),
        screen.records().len()
    )
}
