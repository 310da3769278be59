// src/session/http.rs

//! Status page served to a browser.
//!
//! There is no HTTP parser: a request is answered if its first three bytes
//! are `GET`, and the connection is always closed after the response.

use crate::common::{error::HttpError, types::SensorReading};
use arrayvec::ArrayString;
use core::fmt::{self, Write};

/// Capacity of the rendered HTML body.
pub const BODY_CAPACITY: usize = 1200;
/// Capacity of the complete response (headers + body).
pub const RESPONSE_CAPACITY: usize = 1400;

pub type HttpResponse = ArrayString<RESPONSE_CAPACITY>;

const PAGE_HEAD: &str = concat!(
    "<!DOCTYPE html><html><head><title>BitDogLab</title>",
    "<meta http-equiv=\"refresh\" content=\"1\">",
    "<style>",
    "body { background-color: #000000; color: #ffffff; font-family: Arial, sans-serif; ",
    "text-align: center; padding-top: 30px; margin-left: 10px; margin-right: 10px; }",
    "h1 { color: #00c0ff; margin-bottom: 25px; }",
    "p { font-size: 1.1em; margin: 10px auto; line-height: 1.5; max-width: 500px; }",
    "span.label { font-weight: bold; color: #a0d8ef; margin-right: 8px; }",
    "span.value-ok { color: #60d060; }",
    "span.value-fail { color: #ff6060; }",
    "span.value-pressed { color: #f0ad4e; font-weight: bold; }",
    "</style>",
    "</head><body>",
    "<h1>Sensor Status - BitDogLab</h1>",
);

const PAGE_TAIL: &str = "</body></html>";

/// True if the request starts with `GET`.
#[inline]
pub fn is_get_request(data: &[u8]) -> bool {
    data.starts_with(b"GET")
}

/// Everything shown on the status page.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StatusPage {
    pub button_pin: u8,
    pub button_pressed: bool,
    pub sensor_pin: u8,
    pub reading: SensorReading,
}

impl StatusPage {
    fn button_class(&self) -> &'static str {
        if self.button_pressed {
            "value-pressed"
        } else {
            "value-ok"
        }
    }

    fn button_text(&self) -> &'static str {
        if self.button_pressed {
            "PRESSED"
        } else {
            "RELEASED"
        }
    }

    fn sensor_class(&self) -> &'static str {
        if self.reading.valid {
            "value-ok"
        } else {
            "value-fail"
        }
    }

    fn sensor_text(&self) -> &'static str {
        if self.reading.valid {
            "OK"
        } else {
            "Read failure"
        }
    }

    /// Writes the HTML document.
    pub fn write_body<W: Write>(&self, out: &mut W) -> fmt::Result {
        out.write_str(PAGE_HEAD)?;
        write!(
            out,
            "<p><span class=\"label\">Button (GP{}):</span><span class=\"{}\">{}</span></p>",
            self.button_pin,
            self.button_class(),
            self.button_text()
        )?;
        write!(
            out,
            "<p><span class=\"label\">DHT11 (GP{}):</span><span class=\"{}\">{}</span></p>",
            self.sensor_pin,
            self.sensor_class(),
            self.sensor_text()
        )?;
        write!(
            out,
            "<p><span class=\"label\">Temperature:</span>{:.1} &deg;C</p>",
            self.reading.temperature_or_sentinel()
        )?;
        write!(
            out,
            "<p><span class=\"label\">Humidity:</span>{:.1} %</p>",
            self.reading.humidity_or_sentinel()
        )?;
        out.write_str(PAGE_TAIL)
    }

    /// Renders the complete `200 OK` response.
    pub fn render(&self) -> Result<HttpResponse, HttpError> {
        let mut body = ArrayString::<BODY_CAPACITY>::new();
        self.write_body(&mut body).map_err(|_| HttpError::BodyTooLarge {
            capacity: BODY_CAPACITY,
        })?;

        let mut response = HttpResponse::new();
        write_response(&mut response, &body).map_err(|_| HttpError::ResponseTooLarge {
            capacity: RESPONSE_CAPACITY,
        })?;
        Ok(response)
    }
}

/// Wraps `body` in the fixed `200 OK` header block.
pub fn write_response<W: Write>(out: &mut W, body: &str) -> fmt::Result {
    write!(
        out,
        "HTTP/1.1 200 OK\r\n\
         Content-Type: text/html; charset=utf-8\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\r\n\
         {}",
        body.len(),
        body
    )
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn page(reading: SensorReading, pressed: bool) -> StatusPage {
        StatusPage {
            button_pin: 5,
            button_pressed: pressed,
            sensor_pin: 8,
            reading,
        }
    }

    fn split(response: &str) -> (&str, &str) {
        let idx = response.find("\r\n\r\n").unwrap();
        (&response[..idx], &response[idx + 4..])
    }

    #[test]
    fn test_get_sniff() {
        assert!(is_get_request(b"GET / HTTP/1.1\r\n"));
        assert!(is_get_request(b"GET"));
        assert!(!is_get_request(b"GE"));
        assert!(!is_get_request(b"POST / HTTP/1.1"));
        assert!(!is_get_request(b"get /"));
        assert!(!is_get_request(b""));
    }

    #[test]
    fn test_valid_reading_page() {
        let response = page(SensorReading::new(25.0, 60.0), false).render().unwrap();
        let (_, body) = split(&response);
        assert!(body.contains("25.0 &deg;C"));
        assert!(body.contains("60.0 %"));
        assert!(body.contains("<span class=\"value-ok\">OK</span>"));
        assert!(body.contains("<span class=\"value-ok\">RELEASED</span>"));
        assert!(body.contains("Button (GP5)"));
        assert!(body.contains("DHT11 (GP8)"));
        assert!(!body.contains("<span class=\"value-fail\">"));
    }

    #[test]
    fn test_failed_reading_page() {
        let response = page(SensorReading::invalid(), true).render().unwrap();
        let (_, body) = split(&response);
        assert!(body.contains("-99.0 &deg;C"));
        assert!(body.contains("-99.0 %"));
        assert!(body.contains("<span class=\"value-fail\">Read failure</span>"));
        assert!(body.contains("<span class=\"value-pressed\">PRESSED</span>"));
    }

    #[test]
    fn test_headers_and_content_length() {
        let response = page(SensorReading::new(21.0, 45.0), false).render().unwrap();
        let (head, body) = split(&response);
        let mut lines = head.split("\r\n");
        assert_eq!(lines.next(), Some("HTTP/1.1 200 OK"));
        assert_eq!(lines.next(), Some("Content-Type: text/html; charset=utf-8"));
        let expected = format!("Content-Length: {}", body.len());
        assert_eq!(lines.next(), Some(expected.as_str()));
        assert_eq!(lines.next(), Some("Connection: close"));
        assert!(body.starts_with("<!DOCTYPE html>"));
        assert!(body.ends_with("</body></html>"));
        assert!(body.contains("content=\"1\""));
    }

    #[test]
    fn test_body_overflow_reported() {
        let mut small = ArrayString::<64>::new();
        assert!(page(SensorReading::invalid(), false).write_body(&mut small).is_err());
    }

    #[test]
    fn test_response_overflow_reported() {
        let mut small = ArrayString::<32>::new();
        assert!(write_response(&mut small, "x").is_err());
    }
}
