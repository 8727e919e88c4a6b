use encoding_rs::EUC_KR;

/// Меньше групп считаем обычным текстом (например `C:\`)
const MIN_BYTE_GROUPS: usize = 4;

/// Раскодирует метку, пришедшую от агента байтами `c7:d1:b1:db`.
///
/// Байты собираются как `%c7%d1%b1%db`, проходят percent-decode и читаются как EUC-KR.
/// Если что-то не сходится, возвращается исходная метка.
pub fn decode_label(label: &str) -> String {
    decode_byte_groups(label).unwrap_or_else(|| label.to_string())
}

fn decode_byte_groups(label: &str) -> Option<String> {
    let groups: Vec<&str> = label.split(':').collect();
    if groups.len() < MIN_BYTE_GROUPS {
        return None;
    }
    if !groups
        .iter()
        .all(|g| g.len() == 2 && g.bytes().all(|b| b.is_ascii_hexdigit()))
    {
        return None;
    }

    let escaped = format!("%{}", groups.join("%"));
    let bytes = urlencoding::decode_binary(escaped.as_bytes());
    let decoded = EUC_KR.decode_without_bom_handling_and_without_replacement(&bytes)?;

    Some(decoded.trim_end_matches('\0').to_string())
}
