//! 扫描请求
//!
//! 每次调用创建一次，之后不再修改。

use super::OutputKind;

/// eSCL ScanSettings 所用的命名空间
const SCAN_NS: &str = "http://schemas.hp.com/imaging/escl/2011/05/03";
const PWG_NS: &str = "http://www.pwg.org/schemas/2010/12/sm";

/// 扫描区域（单位：1/300 英寸）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanRegion {
    pub x_offset: u32,
    pub y_offset: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for ScanRegion {
    /// 整个平板区域
    fn default() -> Self {
        Self {
            x_offset: 0,
            y_offset: 0,
            width: 2550,
            height: 3508,
        }
    }
}

/// 扫描请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    base_url: String,
    kind: OutputKind,
    resolution: u32,
    color_mode: &'static str,
    region: ScanRegion,
}

impl ScanRequest {
    /// 使用默认参数（300 dpi、RGB24、整个平板）创建扫描请求
    pub fn new(base_url: impl Into<String>, kind: OutputKind) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            kind,
            resolution: 300,
            color_mode: "RGB24",
            region: ScanRegion::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn kind(&self) -> OutputKind {
        self.kind
    }

    /// 构建 ScanSettings XML
    pub fn settings_xml(&self) -> String {
        let region = self.region;
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<scan:ScanSettings xmlns:scan="{scan_ns}" xmlns:pwg="{pwg_ns}">
  <pwg:Version>2.0</pwg:Version>
  <scan:Intent>Document</scan:Intent>
  <pwg:ScanRegions>
    <pwg:ScanRegion>
      <pwg:ContentRegionUnits>escl:ThreeHundredthsOfInches</pwg:ContentRegionUnits>
      <pwg:XOffset>{x}</pwg:XOffset>
      <pwg:YOffset>{y}</pwg:YOffset>
      <pwg:Width>{w}</pwg:Width>
      <pwg:Height>{h}</pwg:Height>
    </pwg:ScanRegion>
  </pwg:ScanRegions>
  <scan:InputSource>Platen</scan:InputSource>
  <scan:ColorMode>{color}</scan:ColorMode>
  <scan:XResolution>{dpi}</scan:XResolution>
  <scan:YResolution>{dpi}</scan:YResolution>
  <pwg:DocumentFormat>{mime}</pwg:DocumentFormat>
</scan:ScanSettings>"#,
            scan_ns = SCAN_NS,
            pwg_ns = PWG_NS,
            x = region.x_offset,
            y = region.y_offset,
            w = region.width,
            h = region.height,
            color = self.color_mode,
            dpi = self.resolution,
            mime = self.kind.mime_type(),
        )
    }

    /// 任务提交地址
    pub fn jobs_url(&self) -> String {
        format!("{}/eSCL/ScanJobs", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_embed_document_format() {
        for kind in OutputKind::ALL {
            let xml = ScanRequest::new("http://scanner.local", kind).settings_xml();
            let expected = format!("<pwg:DocumentFormat>{}</pwg:DocumentFormat>", kind.mime_type());
            assert!(xml.contains(&expected), "{} 缺少 {}", kind, expected);
            assert_eq!(xml.matches("<pwg:DocumentFormat>").count(), 1);
        }
    }

    #[test]
    fn test_settings_defaults() {
        let xml = ScanRequest::new("http://scanner.local", OutputKind::Document).settings_xml();
        assert!(xml.contains("<scan:XResolution>300</scan:XResolution>"));
        assert!(xml.contains("<scan:YResolution>300</scan:YResolution>"));
        assert!(xml.contains("<scan:ColorMode>RGB24</scan:ColorMode>"));
        assert!(xml.contains("<pwg:Width>2550</pwg:Width>"));
        assert!(xml.contains("<pwg:Height>3508</pwg:Height>"));
        assert!(xml.contains("<scan:InputSource>Platen</scan:InputSource>"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let request = ScanRequest::new("http://10.0.0.5:8080/", OutputKind::ImageLossy);
        assert_eq!(request.jobs_url(), "http://10.0.0.5:8080/eSCL/ScanJobs");
        assert_eq!(request.base_url(), "http://10.0.0.5:8080");
    }
}
