use crate::error::AnalyzeError;
use base64::{engine::general_purpose::STANDARD, Engine};

/// 图片的 data URI 表示: data:<mime>;base64,<data>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl DataUri {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// 编码为 data URI 字符串（不做尺寸校验或压缩）
    pub fn encode(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }

    /// 解析 data URI
    pub fn parse(uri: &str) -> Result<Self, AnalyzeError> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| AnalyzeError::Encoding("not a data URI".to_string()))?;
        let (header, data) = rest
            .split_once(',')
            .ok_or_else(|| AnalyzeError::Encoding("data URI has no payload".to_string()))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| AnalyzeError::Encoding("data URI is not base64 encoded".to_string()))?;
        if mime_type.is_empty() {
            return Err(AnalyzeError::Encoding("data URI has no MIME type".to_string()));
        }
        let bytes = STANDARD
            .decode(data.trim())
            .map_err(|e| AnalyzeError::Encoding(format!("invalid base64 payload: {}", e)))?;
        Ok(Self::new(mime_type, bytes))
    }

    pub fn base64_data(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

/// 按文件名扩展名推断图片 MIME 类型
pub fn mime_from_name(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_keeps_bytes() {
        let bytes: Vec<u8> = (0..=255u8).chain([0, 0, 255]).collect();
        let uri = DataUri::new("image/png", bytes.clone()).encode();
        assert!(uri.starts_with("data:image/png;base64,"));
        let decoded = DataUri::parse(&uri).unwrap();
        assert_eq!(decoded.mime_type, "image/png");
        assert_eq!(decoded.bytes, bytes);
    }

    #[test]
    fn empty_image_still_encodes() {
        let uri = DataUri::new("image/jpeg", Vec::new()).encode();
        assert_eq!(uri, "data:image/jpeg;base64,");
        assert!(DataUri::parse(&uri).unwrap().bytes.is_empty());
    }

    #[test]
    fn rejects_non_data_uri() {
        assert!(matches!(
            DataUri::parse("https://example.com/a.png"),
            Err(AnalyzeError::Encoding(_))
        ));
        assert!(DataUri::parse("data:image/png,plain").is_err());
        assert!(DataUri::parse("data:image/png;base64,@@@").is_err());
        assert!(DataUri::parse("data:;base64,AAAA").is_err());
    }

    #[test]
    fn guesses_mime_from_extension() {
        assert_eq!(mime_from_name("foto.JPG"), "image/jpeg");
        assert_eq!(mime_from_name("a.b.webp"), "image/webp");
        assert_eq!(mime_from_name("sem_extensao"), "application/octet-stream");
    }
}
