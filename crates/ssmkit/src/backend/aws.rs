//! AWS SDK backend.

use super::{Backend, ClientFactory};
use crate::Client;
use crate::error::{Error, Result};
use crate::types::{
    CreateDocument, Document, DocumentDescription, DocumentFormat, LATEST_VERSION,
};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_ssm::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_ssm::types::DocumentPermissionType;

/// Credentials used to build AWS clients.
#[derive(Clone)]
pub enum AwsCredentials {
    /// Explicit access key pair (from the environment or a `.env` file)
    Static {
        access_key_id: String,
        secret_access_key: String,
        session_token: Option<String>,
    },
    /// Named profile resolved by the SDK's profile chain
    Profile(String),
}

impl std::fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static { access_key_id, .. } => f
                .debug_struct("Static")
                .field("access_key_id", access_key_id)
                .finish_non_exhaustive(),
            Self::Profile(name) => f.debug_tuple("Profile").field(name).finish(),
        }
    }
}

/// Backend that talks to AWS Systems Manager.
#[derive(Debug, Clone)]
pub struct AwsBackend {
    client: aws_sdk_ssm::Client,
}

impl AwsBackend {
    /// Build a backend for `region`.
    pub async fn new(
        region: &str,
        credentials: &AwsCredentials,
        endpoint_url: Option<&str>,
    ) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));

        match credentials {
            AwsCredentials::Static {
                access_key_id,
                secret_access_key,
                session_token,
            } => {
                let creds = aws_sdk_ssm::config::Credentials::new(
                    access_key_id,
                    secret_access_key,
                    session_token.clone(),
                    None, // expiry
                    "ssmdoc-static",
                );
                loader = loader.credentials_provider(creds);
            }
            AwsCredentials::Profile(profile) => {
                loader = loader.profile_name(profile);
            }
        }

        let sdk_config = loader.load().await;
        let mut client_config = aws_sdk_ssm::config::Builder::from(&sdk_config);
        if let Some(endpoint) = endpoint_url {
            client_config = client_config.endpoint_url(endpoint);
        }

        log::debug!(
            "AWS SSM client initialized (region: {region}, endpoint: {})",
            endpoint_url.unwrap_or("default")
        );

        Self {
            client: aws_sdk_ssm::Client::from_conf(client_config.build()),
        }
    }

    /// Wrap an existing SDK client.
    pub fn from_client(client: aws_sdk_ssm::Client) -> Self {
        Self { client }
    }
}

/// Map an SDK error to a categorized [`Error`].
fn sdk_error<E>(operation: &'static str, name: &str, err: SdkError<E>) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let code = err.code().map(str::to_string);
    let message = DisplayErrorContext(&err).to_string();
    Error::from_code(operation, name, code.as_deref(), &message)
}

fn parse_format(format: Option<&aws_sdk_ssm::types::DocumentFormat>) -> Option<DocumentFormat> {
    format.and_then(|f| f.as_str().parse().ok())
}

fn parse_type(
    document_type: Option<&aws_sdk_ssm::types::DocumentType>,
) -> Option<crate::types::DocumentType> {
    document_type.and_then(|t| t.as_str().parse().ok())
}

fn description_from_sdk(
    description: Option<&aws_sdk_ssm::types::DocumentDescription>,
    name: &str,
) -> DocumentDescription {
    let Some(d) = description else {
        return DocumentDescription {
            name: name.to_string(),
            ..Default::default()
        };
    };

    DocumentDescription {
        name: d.name().unwrap_or(name).to_string(),
        format: parse_format(d.document_format()),
        document_type: parse_type(d.document_type()),
        document_version: d.document_version().map(str::to_string),
        latest_version: d.latest_version().map(str::to_string),
        default_version: d.default_version().map(str::to_string),
        version_name: d.version_name().map(str::to_string),
        status: d.status().map(|s| s.as_str().to_string()),
        hash: d.hash().map(str::to_string),
        hash_type: d.hash_type().map(|h| h.as_str().to_string()),
        created_date: d
            .created_date()
            .and_then(|t| chrono::DateTime::from_timestamp(t.secs(), t.subsec_nanos())),
    }
}

fn non_empty(ids: &[String]) -> Option<Vec<String>> {
    if ids.is_empty() {
        None
    } else {
        Some(ids.to_vec())
    }
}

#[async_trait]
impl Backend for AwsBackend {
    async fn get_document(
        &self,
        name: &str,
        version: Option<&str>,
        format: Option<DocumentFormat>,
    ) -> Result<Document> {
        let out = self
            .client
            .get_document()
            .name(name)
            .set_document_version(version.map(str::to_string))
            .set_document_format(format.map(|f| aws_sdk_ssm::types::DocumentFormat::from(f.as_str())))
            .send()
            .await
            .map_err(|e| sdk_error("GetDocument", name, e))?;

        Ok(Document {
            name: out.name().unwrap_or(name).to_string(),
            format: parse_format(out.document_format()),
            document_type: parse_type(out.document_type()),
            version: out.document_version().map(str::to_string),
            version_name: out.version_name().map(str::to_string),
            status: out.status().map(|s| s.as_str().to_string()),
            content: out.content().map(str::to_string),
        })
    }

    async fn describe_document(
        &self,
        name: &str,
        version: Option<&str>,
    ) -> Result<DocumentDescription> {
        let out = self
            .client
            .describe_document()
            .name(name)
            .set_document_version(version.map(str::to_string))
            .send()
            .await
            .map_err(|e| sdk_error("DescribeDocument", name, e))?;

        Ok(description_from_sdk(out.document(), name))
    }

    async fn create_document(&self, request: &CreateDocument) -> Result<DocumentDescription> {
        let out = self
            .client
            .create_document()
            .name(&request.name)
            .content(&request.content)
            .document_type(aws_sdk_ssm::types::DocumentType::from(
                request.document_type.as_str(),
            ))
            .document_format(aws_sdk_ssm::types::DocumentFormat::from(request.format.as_str()))
            .send()
            .await
            .map_err(|e| sdk_error("CreateDocument", &request.name, e))?;

        Ok(description_from_sdk(out.document_description(), &request.name))
    }

    async fn update_document(
        &self,
        name: &str,
        content: &str,
        format: DocumentFormat,
    ) -> Result<DocumentDescription> {
        let out = self
            .client
            .update_document()
            .name(name)
            .content(content)
            .document_version(LATEST_VERSION)
            .document_format(aws_sdk_ssm::types::DocumentFormat::from(format.as_str()))
            .send()
            .await
            .map_err(|e| sdk_error("UpdateDocument", name, e))?;

        Ok(description_from_sdk(out.document_description(), name))
    }

    async fn update_default_version(&self, name: &str, version: &str) -> Result<()> {
        self.client
            .update_document_default_version()
            .name(name)
            .document_version(version)
            .send()
            .await
            .map_err(|e| sdk_error("UpdateDocumentDefaultVersion", name, e))?;
        Ok(())
    }

    async fn delete_document(&self, name: &str) -> Result<()> {
        self.client
            .delete_document()
            .name(name)
            .send()
            .await
            .map_err(|e| sdk_error("DeleteDocument", name, e))?;
        Ok(())
    }

    async fn share_permissions(&self, name: &str) -> Result<Vec<String>> {
        let mut accounts = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let out = self
                .client
                .describe_document_permission()
                .name(name)
                .permission_type(DocumentPermissionType::Share)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| sdk_error("DescribeDocumentPermission", name, e))?;

            accounts.extend(out.account_ids().iter().cloned());

            match out.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        Ok(accounts)
    }

    async fn modify_share_permissions(
        &self,
        name: &str,
        to_add: &[String],
        to_remove: &[String],
    ) -> Result<()> {
        self.client
            .modify_document_permission()
            .name(name)
            .permission_type(DocumentPermissionType::Share)
            .set_account_ids_to_add(non_empty(to_add))
            .set_account_ids_to_remove(non_empty(to_remove))
            .shared_document_version(LATEST_VERSION)
            .send()
            .await
            .map_err(|e| sdk_error("ModifyDocumentPermission", name, e))?;
        Ok(())
    }
}

/// [`ClientFactory`] that builds AWS-backed clients.
#[derive(Debug, Clone)]
pub struct AwsClientFactory {
    credentials: AwsCredentials,
    endpoint_url: Option<String>,
}

impl AwsClientFactory {
    /// Create a factory from resolved credentials.
    pub fn new(credentials: AwsCredentials) -> Self {
        Self {
            credentials,
            endpoint_url: None,
        }
    }

    /// Override the service endpoint (e.g. a local emulator).
    pub fn with_endpoint_url(mut self, endpoint_url: Option<String>) -> Self {
        self.endpoint_url = endpoint_url;
        self
    }
}

#[async_trait]
impl ClientFactory for AwsClientFactory {
    async fn client(&self, region: &str) -> Result<Client> {
        let backend =
            AwsBackend::new(region, &self.credentials, self.endpoint_url.as_deref()).await;
        Ok(Client::with_backend(backend, region))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_hides_secret() {
        let creds = AwsCredentials::Static {
            access_key_id: "AKIAEXAMPLE".to_string(),
            secret_access_key: "super-secret".to_string(),
            session_token: None,
        };
        let debug = format!("{creds:?}");
        assert!(debug.contains("AKIAEXAMPLE"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_description_from_missing_sdk_value() {
        let description = description_from_sdk(None, "my-doc");
        assert_eq!(description.name, "my-doc");
        assert!(description.latest_version.is_none());
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(&[]), None);
        assert_eq!(
            non_empty(&["111111111111".to_string()]),
            Some(vec!["111111111111".to_string()])
        );
    }
}
