//! Provider credentials and SCM authentication declarations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Credentials made available to Terraform providers.
///
/// All populated parts apply together.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Secret loaded into the task environment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_name_ref: Option<SecretNameRef>,
    /// AWS identity mechanisms.
    #[serde(default, rename = "aws", skip_serializing_if = "Option::is_none")]
    pub aws_credentials: Option<AwsCredentials>,
    /// Annotations for the task service account (e.g. GCP workload
    /// identity).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub service_account_annotations: BTreeMap<String, String>,
}

impl Credentials {
    /// Creates credentials backed by a secret.
    #[must_use]
    pub fn from_secret(secret: SecretNameRef) -> Self {
        Self {
            secret_name_ref: Some(secret),
            ..Self::default()
        }
    }

    /// Creates credentials using an IRSA role ARN.
    #[must_use]
    pub fn irsa(role_arn: impl Into<String>) -> Self {
        Self {
            aws_credentials: Some(AwsCredentials {
                irsa: role_arn.into(),
                kiam: String::new(),
            }),
            ..Self::default()
        }
    }

    /// Creates credentials using a KIAM role name.
    #[must_use]
    pub fn kiam(role: impl Into<String>) -> Self {
        Self {
            aws_credentials: Some(AwsCredentials {
                irsa: String::new(),
                kiam: role.into(),
            }),
            ..Self::default()
        }
    }

    /// Adds a service-account annotation.
    #[must_use]
    pub fn with_service_account_annotation(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.service_account_annotations
            .insert(key.into(), value.into());
        self
    }
}

/// Reference to a secret whose data becomes environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SecretNameRef {
    /// Secret name.
    pub name: String,
    /// Secret namespace; defaults to the resource namespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Single key to load; the whole secret is loaded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl SecretNameRef {
    /// Creates a reference to a whole secret.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            key: None,
        }
    }

    /// Sets the secret namespace.
    #[must_use]
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Restricts the reference to one key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// Kubernetes-specific ways of granting AWS credentials to task pods.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AwsCredentials {
    /// IAM role ARN for IRSA; annotates the task service account.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub irsa: String,
    /// Role name for KIAM; annotates the task pod.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kiam: String,
}

/// Secret holding an SSH private key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SshKeySecretRef {
    /// Secret name.
    pub name: String,
    /// Secret namespace; defaults to the resource namespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Key holding the private key; defaults to `id_rsa`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// Secret holding a token or password.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenSecretRef {
    /// Secret name.
    pub name: String,
    /// Secret namespace; defaults to the resource namespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Key holding the token; defaults to `token`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// Authentication for one SCM host.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScmAuthMethod {
    /// SCM host name.
    pub host: String,
    /// Git authentication options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<GitScm>,
}

/// Git authentication options for an SCM host.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GitScm {
    /// Git over SSH.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh: Option<GitSsh>,
    /// Git over HTTPS with a token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub https: Option<GitHttps>,
}

/// Git over SSH, optionally through the SSH tunnel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitSsh {
    /// Route the connection through the SSH tunnel.
    #[serde(default)]
    pub require_proxy: bool,
    /// Secret holding the SSH key.
    pub ssh_key_secret_ref: SshKeySecretRef,
}

/// Git over HTTPS with a token.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHttps {
    /// Route the connection through the SSH tunnel.
    #[serde(default)]
    pub require_proxy: bool,
    /// Secret holding the token.
    pub token_secret_ref: TokenSecretRef,
}

/// SSH tunnel used to reach SCM hosts on private networks.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyOpts {
    /// Bastion host.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub host: String,
    /// Bastion user.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user: String,
    /// Secret holding the bastion SSH key.
    pub ssh_key_secret_ref: SshKeySecretRef,
}
