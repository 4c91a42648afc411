use serde_json::json;

#[derive(Clone, Debug, Default)]
pub struct Transcript {
    header: String,
    lines: Vec<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            header: "dragon-trials-v1".to_string(),
            lines: Vec::new(),
        }
    }

    pub fn with_header(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            lines: Vec::new(),
        }
    }

    pub fn log_turn(&mut self, turn: usize) {
        self.lines.push(format!("|turn|{turn}"));
    }

    pub fn log_move(&mut self, label: &str) {
        self.lines.push(format!("|move|player|{label}"));
    }

    pub fn log_damage(&mut self, target: &str, hp: u16, max_hp: u16) {
        self.lines.push(format!("|-damage|{target}|{hp}/{max_hp}"));
    }

    pub fn log_heal(&mut self, source: &str, amount: u16, hp: u16) {
        self.lines.push(format!("|-heal|{source}|{amount}|{hp}"));
    }

    pub fn log_guard(&mut self) {
        self.lines.push("|-guard|player".to_string());
    }

    pub fn log_enemy_move(&mut self, guarded: bool) {
        if guarded {
            self.lines.push("|move|dragon|FIRE BREATH|guarded".to_string());
        } else {
            self.lines.push("|move|dragon|FIRE BREATH".to_string());
        }
    }

    pub fn log_faint(&mut self, side: &str) {
        self.lines.push(format!("|faint|{side}"));
    }

    pub fn log_reset(&mut self) {
        self.lines.push("|reset|".to_string());
    }

    pub fn log_win(&mut self) {
        self.lines.push("|win|player".to_string());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "header": self.header,
            "log": self.lines,
        })
    }
}
