use super::{CloudError, CloudTransport};

/// Talks to the Apps Script web app that keeps `save_<username>.json` files.
///
/// `GET <url>?username=<name>` returns the save (an empty body or `null` when there
/// is none) and `POST <url>?username=<name>` stores the request body.
#[derive(Debug, Clone)]
pub struct AppsScriptTransport {
    base_url: String,
}

impl AppsScriptTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        AppsScriptTransport {
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, username: &str) -> String {
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{}username={}",
            self.base_url,
            separator,
            urlencoding::encode(username)
        )
    }

    fn convert_error(e: ureq::Error) -> CloudError {
        match e {
            ureq::Error::Status(status, response) => CloudError::Http {
                status,
                body: response.into_string().unwrap_or_default(),
            },
            other => CloudError::Network(other.to_string()),
        }
    }
}

impl CloudTransport for AppsScriptTransport {
    fn fetch(&self, username: &str) -> Result<Option<String>, CloudError> {
        let response = ureq::get(&self.endpoint(username))
            .call()
            .map_err(Self::convert_error)?;

        let body = response.into_string()?;
        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(None);
        }
        Ok(Some(trimmed.to_string()))
    }

    fn upload(&self, username: &str, json: &str) -> Result<(), CloudError> {
        ureq::post(&self.endpoint(username))
            .set("Content-Type", "application/json")
            .send_string(json)
            .map_err(Self::convert_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_is_encoded() {
        let transport = AppsScriptTransport::new("https://script.example/exec");
        assert_eq!(
            transport.endpoint("luna moon&co"),
            "https://script.example/exec?username=luna%20moon%26co"
        );
    }

    #[test]
    fn test_existing_query_is_kept() {
        let transport = AppsScriptTransport::new("https://script.example/exec?v=2");
        assert_eq!(
            transport.endpoint("luna"),
            "https://script.example/exec?v=2&username=luna"
        );
    }
}
